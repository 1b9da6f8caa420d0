use crate::coords::FrameSize;

/// Value of a single uniform, as handed to the device.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Float(f32),
    Vec2([f32; 2]),
    Vec4([f32; 4]),
    /// Texture unit index.
    Sampler(i32),
}

/// Per-draw uniform block.
///
/// Superset of what any program reads; each program only declares (and the
/// GL device only uploads) the names it uses. All lengths are device pixels
/// in UI space (top-left origin).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Uniforms {
    /// `u_frame_size`: render target size.
    pub frame_size: [f32; 2],
    /// `u_bounds`: `[x, y, w, h]` of the drawn quad.
    pub bounds: [f32; 4],
    /// `u_radii`: `[tl, tr, br, bl]` corner radii.
    pub radii: [f32; 4],
    /// `u_fill`: fill color, line color, or texture tint (premultiplied).
    pub fill: [f32; 4],
    /// `u_stroke`: stroke color (premultiplied).
    pub stroke: [f32; 4],
    /// `u_stroke_width`: stroke width, or the full width of a line.
    pub stroke_width: f32,
    /// `u_line`: segment endpoints `[x0, y0, x1, y1]`.
    pub line: [f32; 4],
}

impl Uniforms {
    #[inline]
    pub fn new(frame: FrameSize) -> Self {
        Self { frame_size: frame.to_vec2().to_array(), ..Self::default() }
    }

    /// Looks up a uniform by its GLSL name.
    pub fn value(&self, name: &str) -> Option<UniformValue> {
        Some(match name {
            "u_frame_size" => UniformValue::Vec2(self.frame_size),
            "u_bounds" => UniformValue::Vec4(self.bounds),
            "u_radii" => UniformValue::Vec4(self.radii),
            "u_fill" => UniformValue::Vec4(self.fill),
            "u_stroke" => UniformValue::Vec4(self.stroke),
            "u_stroke_width" => UniformValue::Float(self.stroke_width),
            "u_line" => UniformValue::Vec4(self.line),
            "u_texture" => UniformValue::Sampler(0),
            _ => return None,
        })
    }
}
