use super::Vec2;

/// Render target size in device pixels, plus the logical→device scale.
///
/// Shaders use the height to flip between the GPU's bottom-left origin and
/// the UI's top-left origin.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
    /// Device pixels per logical pixel (DPI scale).
    pub scale: f32,
}

impl FrameSize {
    #[inline]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height, scale: 1.0 }
    }

    #[inline]
    pub const fn with_scale(width: u32, height: u32, scale: f32) -> Self {
        Self { width, height, scale }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0 && self.scale.is_finite() && self.scale > 0.0
    }

    /// `[width, height]` as floats, the layout of the `u_frame_size` uniform.
    #[inline]
    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    #[inline]
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for FrameSize {
    fn default() -> Self {
        Self::new(1, 1)
    }
}
