use crate::coords::{FrameSize, Rect, Vec2};
use crate::paint::Color;
use crate::shader::{eval, ProgramSource, Profile, ShaderError, ShaderKind, ShaderStage};

use super::{Device, DeviceError, DrawCall, ScissorRect, TextureDesc, TextureFormat};

/// Program handle of the [`SoftDevice`]. Compilation only validates the
/// emitted source; shading runs through `shader::eval`.
#[derive(Debug)]
pub struct SoftProgram {
    kind: ShaderKind,
    profile: Profile,
}

impl SoftProgram {
    pub fn kind(&self) -> ShaderKind {
        self.kind
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }
}

#[derive(Debug)]
pub struct SoftTexture {
    id: u64,
    desc: TextureDesc,
    pixels: Vec<u8>,
}

impl SoftTexture {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn desc(&self) -> TextureDesc {
        self.desc
    }

    /// Nearest-neighbour sample at normalized `uv`, as a GL sampler would
    /// return it (`Alpha8` comes back in `.r`).
    fn sample(&self, uv: [f32; 2]) -> [f32; 4] {
        let TextureDesc { width, height, format } = self.desc;
        let x = ((uv[0] * width as f32).floor() as i64).clamp(0, width as i64 - 1) as usize;
        let y = ((uv[1] * height as f32).floor() as i64).clamp(0, height as i64 - 1) as usize;
        let i = (y * width as usize + x) * format.bytes_per_pixel();
        match format {
            TextureFormat::Rgba8 => {
                let p = &self.pixels[i..i + 4];
                [unorm(p[0]), unorm(p[1]), unorm(p[2]), unorm(p[3])]
            }
            TextureFormat::Alpha8 => [unorm(self.pixels[i]), 0.0, 0.0, 1.0],
        }
    }
}

#[inline]
fn unorm(v: u8) -> f32 {
    v as f32 / 255.0
}

/// Counters exposed for tests and diagnostics.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct SoftStats {
    pub programs_compiled: usize,
    pub programs_live: usize,
    pub textures_created: usize,
    pub textures_live: usize,
    pub draw_calls: usize,
    pub frames_begun: usize,
    pub frames_presented: usize,
}

#[derive(Debug, Default)]
struct Faults {
    compile: Option<ShaderKind>,
    draw_at: Option<usize>,
    texture_upload: bool,
}

/// CPU rendering device.
///
/// Holds a premultiplied `f32` framebuffer in UI orientation (row 0 is the
/// top). Every pixel whose center lies inside a draw quad (and the scissor)
/// is shaded with the CPU mirror of the fragment program and blended with
/// `ONE, ONE_MINUS_SRC_ALPHA`.
#[derive(Debug)]
pub struct SoftDevice {
    profile: Profile,
    max_texture_dimension: u32,

    size: FrameSize,
    pixels: Vec<[f32; 4]>,
    scissor: Option<ScissorRect>,

    next_texture_id: u64,
    frame_draws: usize,
    faults: Faults,
    stats: SoftStats,
}

impl Default for SoftDevice {
    fn default() -> Self {
        Self::new(Profile::Desktop)
    }
}

impl SoftDevice {
    pub fn new(profile: Profile) -> Self {
        let size = FrameSize::default();
        Self {
            profile,
            max_texture_dimension: 8192,
            size,
            pixels: vec![[0.0; 4]; size.area()],
            scissor: None,
            next_texture_id: 1,
            frame_draws: 0,
            faults: Faults::default(),
            stats: SoftStats::default(),
        }
    }

    pub fn with_max_texture_dimension(mut self, max: u32) -> Self {
        self.max_texture_dimension = max;
        self
    }

    // ── fault injection ───────────────────────────────────────────────────

    /// Every compile of `kind` fails with a driver-style log.
    pub fn fail_compile(&mut self, kind: ShaderKind) {
        self.faults.compile = Some(kind);
    }

    /// The `n`th draw call (1-based) of the next frame that reaches it fails.
    /// One-shot.
    pub fn fail_draw_at(&mut self, n: usize) {
        self.faults.draw_at = Some(n);
    }

    /// The next texture upload fails. One-shot.
    pub fn fail_next_upload(&mut self) {
        self.faults.texture_upload = true;
    }

    // ── readback ──────────────────────────────────────────────────────────

    pub fn size(&self) -> FrameSize {
        self.size
    }

    pub fn stats(&self) -> SoftStats {
        self.stats
    }

    /// Premultiplied color at device pixel `(x, y)`, UI orientation.
    pub fn read_pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        let i = y as usize * self.size.width as usize + x as usize;
        self.pixels.get(i).map(|&c| Color::from_array(c))
    }

    /// Straight-alpha copy of the framebuffer.
    pub fn to_rgba_image(&self) -> image::RgbaImage {
        let mut img = image::RgbaImage::new(self.size.width, self.size.height);
        for (px, c) in img.pixels_mut().zip(&self.pixels) {
            *px = image::Rgba(Color::from_array(*c).to_straight_u8());
        }
        img
    }

    // ── helpers ───────────────────────────────────────────────────────────

    /// Half-open pixel span whose centers lie in `[lo, hi)`, clamped to `max`.
    fn span(lo: f32, hi: f32, max: u32) -> (u32, u32) {
        let start = (lo - 0.5).ceil().max(0.0);
        let end = (hi - 0.5).ceil().max(0.0);
        (start.min(max as f32) as u32, end.min(max as f32) as u32)
    }

    fn blend(dst: &mut [f32; 4], src: [f32; 4]) {
        let inv = 1.0 - src[3];
        for c in 0..4 {
            dst[c] = src[c] + dst[c] * inv;
        }
    }

    fn shade_quad(&mut self, kind: ShaderKind, quad: Rect, call: &DrawCall<'_, SoftTexture>) {
        let (mut x0, mut x1) = Self::span(quad.min().x, quad.max().x, self.size.width);
        let (mut y0, mut y1) = Self::span(quad.min().y, quad.max().y, self.size.height);
        if let Some(s) = self.scissor {
            x0 = x0.max(s.x);
            y0 = y0.max(s.y);
            x1 = x1.min(s.x.saturating_add(s.width));
            y1 = y1.min(s.y.saturating_add(s.height));
        }

        let width = self.size.width as usize;
        let texture = call.texture;
        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let out = eval::shade(kind, &call.uniforms, p, |uv| {
                    texture.map_or([0.0; 4], |t| t.sample(uv))
                });
                if let Some(src) = out {
                    Self::blend(&mut self.pixels[y as usize * width + x as usize], src);
                }
            }
        }
    }
}

impl Device for SoftDevice {
    type Program = SoftProgram;
    type Texture = SoftTexture;

    fn profile(&self) -> Profile {
        self.profile
    }

    fn max_texture_dimension(&self) -> u32 {
        self.max_texture_dimension
    }

    fn compile_program(&mut self, source: &ProgramSource) -> Result<SoftProgram, ShaderError> {
        let kind = source.kind;
        let profile = source.profile;

        if self.faults.compile == Some(kind) {
            return Err(ShaderError::Compile {
                kind,
                profile,
                stage: ShaderStage::Fragment,
                log: "0:1(1): error: injected compile failure".to_string(),
            });
        }

        // A driver rejects source for a language version it does not speak.
        for (stage, text) in [
            (ShaderStage::Vertex, &source.vertex),
            (ShaderStage::Fragment, &source.fragment),
        ] {
            let version = text.lines().next().unwrap_or_default();
            if version != self.profile.version_directive() || !text.contains("void main()") {
                return Err(ShaderError::Compile {
                    kind,
                    profile,
                    stage,
                    log: format!("unsupported or malformed source (first line `{version}`)"),
                });
            }
        }

        self.stats.programs_compiled += 1;
        self.stats.programs_live += 1;
        Ok(SoftProgram { kind, profile })
    }

    fn delete_program(&mut self, _program: SoftProgram) {
        self.stats.programs_live = self.stats.programs_live.saturating_sub(1);
    }

    fn create_texture(&mut self, desc: TextureDesc, pixels: &[u8]) -> Result<SoftTexture, DeviceError> {
        if std::mem::take(&mut self.faults.texture_upload) {
            return Err(DeviceError::Create {
                what: "texture",
                reason: "injected upload failure".to_string(),
            });
        }
        if pixels.len() != desc.byte_len() {
            return Err(DeviceError::Create {
                what: "texture",
                reason: format!("expected {} bytes, got {}", desc.byte_len(), pixels.len()),
            });
        }

        let id = self.next_texture_id;
        self.next_texture_id += 1;
        self.stats.textures_created += 1;
        self.stats.textures_live += 1;
        Ok(SoftTexture { id, desc, pixels: pixels.to_vec() })
    }

    fn delete_texture(&mut self, _texture: SoftTexture) {
        self.stats.textures_live = self.stats.textures_live.saturating_sub(1);
    }

    fn begin_frame(&mut self, size: FrameSize) {
        if size.width != self.size.width || size.height != self.size.height {
            self.pixels = vec![[0.0; 4]; size.area()];
        }
        self.size = size;
        self.scissor = None;
        self.frame_draws = 0;
        self.stats.frames_begun += 1;
    }

    fn clear(&mut self, color: Color) {
        self.pixels.fill(color.to_array());
    }

    fn set_scissor(&mut self, scissor: Option<ScissorRect>) {
        self.scissor = scissor;
    }

    fn draw(&mut self, program: &SoftProgram, call: &DrawCall<'_, SoftTexture>) -> Result<(), DeviceError> {
        self.frame_draws += 1;
        if self.faults.draw_at == Some(self.frame_draws) {
            self.faults.draw_at = None;
            return Err(DeviceError::Draw(format!(
                "injected failure on draw {}",
                self.frame_draws
            )));
        }
        if program.kind.is_textured() && call.texture.is_none() {
            return Err(DeviceError::MissingTexture { kind: program.kind });
        }

        self.shade_quad(program.kind, call.quad, call);
        self.stats.draw_calls += 1;
        Ok(())
    }

    fn present(&mut self) -> Result<(), DeviceError> {
        self.stats.frames_presented += 1;
        Ok(())
    }
}
