use bytemuck::{Pod, Zeroable};

use crate::coords::Rect;
use crate::shader::{ShaderKind, Uniforms};

/// Pixel layout of a texture upload.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum TextureFormat {
    /// 8-bit RGBA, premultiplied alpha.
    Rgba8,
    /// 8-bit single channel coverage (glyph masks). Sampled from `.r`.
    Alpha8,
}

impl TextureFormat {
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            TextureFormat::Rgba8 => 4,
            TextureFormat::Alpha8 => 1,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TextureDesc {
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
}

impl TextureDesc {
    #[inline]
    pub fn new(width: u32, height: u32, format: TextureFormat) -> Self {
        Self { width, height, format }
    }

    /// Expected length of the pixel slice.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.width as usize * self.height as usize * self.format.bytes_per_pixel()
    }
}

/// Scissor rectangle in device pixels, UI space (top-left origin).
///
/// Devices with a bottom-left origin flip it themselves.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl ScissorRect {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub pos: [f32; 2],
}

/// Two triangles covering `r`.
pub fn quad_vertices(r: Rect) -> [QuadVertex; 6] {
    let [x0, y0] = r.min().to_array();
    let [x1, y1] = r.max().to_array();
    [
        QuadVertex { pos: [x0, y0] },
        QuadVertex { pos: [x1, y0] },
        QuadVertex { pos: [x1, y1] },
        QuadVertex { pos: [x0, y0] },
        QuadVertex { pos: [x1, y1] },
        QuadVertex { pos: [x0, y1] },
    ]
}

/// One draw: a device-pixel quad shaded by `kind`'s program.
#[derive(Debug)]
pub struct DrawCall<'a, T> {
    pub kind: ShaderKind,
    /// Covered area in device pixels, UI space.
    pub quad: Rect,
    pub uniforms: Uniforms,
    /// Bound to unit 0. Required for textured kinds.
    pub texture: Option<&'a T>,
}
