use std::marker::PhantomData;
use std::sync::Arc;

use glow::{HasContext, PixelUnpackData};
use log::{debug, info};

use crate::coords::FrameSize;
use crate::paint::Color;
use crate::shader::{
    ProgramSource, Profile, ShaderError, ShaderKind, ShaderStage, UniformValue, POSITION_ATTRIBUTE,
};

use super::{quad_vertices, Device, DeviceError, DrawCall, QuadVertex, ScissorRect, TextureDesc, TextureFormat};

/// Linked program plus the uniform locations it declares.
pub struct GlProgram {
    program: glow::Program,
    kind: ShaderKind,
    uniforms: Vec<(&'static str, glow::UniformLocation)>,
}

impl GlProgram {
    pub fn kind(&self) -> ShaderKind {
        self.kind
    }
}

pub struct GlTexture {
    texture: glow::Texture,
    desc: TextureDesc,
}

impl GlTexture {
    pub fn desc(&self) -> TextureDesc {
        self.desc
    }
}

type PresentHook = Box<dyn FnMut() -> Result<(), String>>;

/// GL 3.3 core / GLES 3.0 device.
///
/// Draws into whichever framebuffer is bound on the caller's context. The
/// context is shared with the windowing layer; buffer swapping stays with the
/// caller and is reached through the present hook.
///
/// Not `Send`: a GL context is current on exactly one thread.
pub struct GlDevice {
    gl: Arc<glow::Context>,
    profile: Profile,
    max_texture_dimension: u32,

    vao: glow::VertexArray,
    vbo: glow::Buffer,

    frame: FrameSize,
    present: Option<PresentHook>,

    _not_send: PhantomData<*const ()>,
}

impl GlDevice {
    /// Creates the device on an existing context.
    ///
    /// # Safety
    ///
    /// `gl` must be current on the calling thread and stay current for every
    /// later call on this device.
    pub unsafe fn new(gl: Arc<glow::Context>) -> Result<Self, DeviceError> {
        let profile = if gl.version().is_embedded {
            Profile::Embedded
        } else {
            Profile::Desktop
        };

        let (vao, vbo, max_texture_dimension) = unsafe {
            let vao = gl
                .create_vertex_array()
                .map_err(|reason| DeviceError::Create { what: "vertex array", reason })?;
            let vbo = gl
                .create_buffer()
                .map_err(|reason| DeviceError::Create { what: "vertex buffer", reason })?;

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.enable_vertex_attrib_array(POSITION_ATTRIBUTE);
            gl.vertex_attrib_pointer_f32(
                POSITION_ATTRIBUTE,
                2,
                glow::FLOAT,
                false,
                std::mem::size_of::<QuadVertex>() as i32,
                0,
            );
            gl.bind_vertex_array(None);

            let max = gl.get_parameter_i32(glow::MAX_TEXTURE_SIZE).max(1) as u32;
            (vao, vbo, max)
        };

        let version = gl.version();
        info!(
            "gl device: {} {}.{} ({} profile), max texture {}",
            if version.is_embedded { "OpenGL ES" } else { "OpenGL" },
            version.major,
            version.minor,
            profile,
            max_texture_dimension,
        );

        Ok(Self {
            gl,
            profile,
            max_texture_dimension,
            vao,
            vbo,
            frame: FrameSize::default(),
            present: None,
            _not_send: PhantomData,
        })
    }

    /// Called by `present`, typically the window's buffer swap.
    pub fn with_present_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut() -> Result<(), String> + 'static,
    {
        self.present = Some(Box::new(hook));
        self
    }

    pub fn gl(&self) -> &Arc<glow::Context> {
        &self.gl
    }

    fn check(&self, op: &'static str) -> Result<(), DeviceError> {
        let code = unsafe { self.gl.get_error() };
        if code == glow::NO_ERROR {
            Ok(())
        } else {
            Err(DeviceError::Gl { op, code })
        }
    }

    unsafe fn compile_stage(
        &self,
        source: &ProgramSource,
        stage: ShaderStage,
        text: &str,
    ) -> Result<glow::Shader, ShaderError> {
        let gl = &self.gl;
        let ty = match stage {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        };
        unsafe {
            let shader = gl.create_shader(ty).map_err(|reason| ShaderError::Create {
                kind: source.kind,
                profile: source.profile,
                reason,
            })?;
            gl.shader_source(shader, text);
            gl.compile_shader(shader);
            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(ShaderError::Compile {
                    kind: source.kind,
                    profile: source.profile,
                    stage,
                    log,
                });
            }
            Ok(shader)
        }
    }
}

impl Drop for GlDevice {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_vertex_array(self.vao);
        }
    }
}

impl Device for GlDevice {
    type Program = GlProgram;
    type Texture = GlTexture;

    fn profile(&self) -> Profile {
        self.profile
    }

    fn max_texture_dimension(&self) -> u32 {
        self.max_texture_dimension
    }

    fn compile_program(&mut self, source: &ProgramSource) -> Result<GlProgram, ShaderError> {
        let gl = Arc::clone(&self.gl);
        unsafe {
            let vs = self.compile_stage(source, ShaderStage::Vertex, &source.vertex)?;
            let fs = match self.compile_stage(source, ShaderStage::Fragment, &source.fragment) {
                Ok(fs) => fs,
                Err(e) => {
                    gl.delete_shader(vs);
                    return Err(e);
                }
            };

            let program = match gl.create_program() {
                Ok(p) => p,
                Err(reason) => {
                    gl.delete_shader(vs);
                    gl.delete_shader(fs);
                    return Err(ShaderError::Create { kind: source.kind, profile: source.profile, reason });
                }
            };
            gl.attach_shader(program, vs);
            gl.attach_shader(program, fs);
            gl.link_program(program);
            gl.detach_shader(program, vs);
            gl.detach_shader(program, fs);
            gl.delete_shader(vs);
            gl.delete_shader(fs);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(ShaderError::Link { kind: source.kind, profile: source.profile, log });
            }

            // Unused uniforms may be optimized out; they simply have no location.
            let uniforms = source
                .uniforms
                .iter()
                .filter_map(|d| gl.get_uniform_location(program, d.name).map(|loc| (d.name, loc)))
                .collect();

            debug!("gl device: linked {} program ({})", source.kind, source.profile);
            Ok(GlProgram { program, kind: source.kind, uniforms })
        }
    }

    fn delete_program(&mut self, program: GlProgram) {
        unsafe { self.gl.delete_program(program.program) };
    }

    fn create_texture(&mut self, desc: TextureDesc, pixels: &[u8]) -> Result<GlTexture, DeviceError> {
        if pixels.len() != desc.byte_len() {
            return Err(DeviceError::Create {
                what: "texture",
                reason: format!("expected {} bytes, got {}", desc.byte_len(), pixels.len()),
            });
        }

        let (internal, format) = match desc.format {
            TextureFormat::Rgba8 => (glow::RGBA8, glow::RGBA),
            TextureFormat::Alpha8 => (glow::R8, glow::RED),
        };

        let gl = &self.gl;
        let texture = unsafe {
            let texture = gl
                .create_texture()
                .map_err(|reason| DeviceError::Create { what: "texture", reason })?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                internal as i32,
                desc.width as i32,
                desc.height as i32,
                0,
                format,
                glow::UNSIGNED_BYTE,
                PixelUnpackData::Slice(Some(pixels)),
            );
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32);
            gl.bind_texture(glow::TEXTURE_2D, None);
            texture
        };

        if let Err(e) = self.check("tex_image_2d") {
            unsafe { self.gl.delete_texture(texture) };
            return Err(e);
        }
        Ok(GlTexture { texture, desc })
    }

    fn delete_texture(&mut self, texture: GlTexture) {
        unsafe { self.gl.delete_texture(texture.texture) };
    }

    fn begin_frame(&mut self, size: FrameSize) {
        self.frame = size;
        let gl = &self.gl;
        unsafe {
            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            gl.viewport(0, 0, size.width as i32, size.height as i32);
            gl.disable(glow::SCISSOR_TEST);
            gl.disable(glow::DEPTH_TEST);
            gl.enable(glow::BLEND);
            gl.blend_func(glow::ONE, glow::ONE_MINUS_SRC_ALPHA);
        }
    }

    fn clear(&mut self, color: Color) {
        unsafe {
            self.gl.clear_color(color.r, color.g, color.b, color.a);
            self.gl.clear(glow::COLOR_BUFFER_BIT);
        }
    }

    fn set_scissor(&mut self, scissor: Option<ScissorRect>) {
        let gl = &self.gl;
        unsafe {
            match scissor {
                Some(s) => {
                    // GL scissor origin is bottom-left.
                    let y = self.frame.height as i32 - (s.y + s.height) as i32;
                    gl.enable(glow::SCISSOR_TEST);
                    gl.scissor(s.x as i32, y, s.width as i32, s.height as i32);
                }
                None => gl.disable(glow::SCISSOR_TEST),
            }
        }
    }

    fn draw(&mut self, program: &GlProgram, call: &DrawCall<'_, GlTexture>) -> Result<(), DeviceError> {
        if program.kind.is_textured() && call.texture.is_none() {
            return Err(DeviceError::MissingTexture { kind: program.kind });
        }

        let vertices = quad_vertices(call.quad);
        let gl = &self.gl;
        unsafe {
            gl.use_program(Some(program.program));
            for (name, loc) in &program.uniforms {
                match call.uniforms.value(name) {
                    Some(UniformValue::Float(v)) => gl.uniform_1_f32(Some(loc), v),
                    Some(UniformValue::Vec2([x, y])) => gl.uniform_2_f32(Some(loc), x, y),
                    Some(UniformValue::Vec4([x, y, z, w])) => gl.uniform_4_f32(Some(loc), x, y, z, w),
                    Some(UniformValue::Sampler(unit)) => gl.uniform_1_i32(Some(loc), unit),
                    None => {}
                }
            }

            if let Some(t) = call.texture {
                gl.active_texture(glow::TEXTURE0);
                gl.bind_texture(glow::TEXTURE_2D, Some(t.texture));
            }

            gl.bind_vertex_array(Some(self.vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vbo));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(&vertices),
                glow::STREAM_DRAW,
            );
            gl.draw_arrays(glow::TRIANGLES, 0, vertices.len() as i32);
            gl.bind_vertex_array(None);

            if call.texture.is_some() {
                gl.bind_texture(glow::TEXTURE_2D, None);
            }
        }

        self.check("draw_arrays")
    }

    fn present(&mut self) -> Result<(), DeviceError> {
        unsafe { self.gl.flush() };
        match self.present.as_mut() {
            Some(hook) => hook().map_err(DeviceError::Present),
            None => Ok(()),
        }
    }
}
