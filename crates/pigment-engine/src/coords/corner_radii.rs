/// Per-corner radii for a rounded rectangle.
///
/// Corners follow CSS convention: top-left, top-right, bottom-right, bottom-left.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CornerRadii {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl CornerRadii {
    #[inline]
    pub const fn new(top_left: f32, top_right: f32, bottom_right: f32, bottom_left: f32) -> Self {
        Self { top_left, top_right, bottom_right, bottom_left }
    }

    /// Uniform radius on all four corners.
    #[inline]
    pub const fn all(r: f32) -> Self {
        Self { top_left: r, top_right: r, bottom_right: r, bottom_left: r }
    }

    /// No rounding.
    #[inline]
    pub const fn zero() -> Self {
        Self::all(0.0)
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.to_array().iter().all(|r| *r <= 0.0 || !r.is_finite())
    }

    #[inline]
    pub fn scaled(self, s: f32) -> Self {
        Self::new(self.top_left * s, self.top_right * s, self.bottom_right * s, self.bottom_left * s)
    }

    /// Radii limited to `[0, max]`; negative and non-finite radii become zero.
    #[inline]
    pub fn clamped(self, max: f32) -> Self {
        let c = |r: f32| if r.is_finite() { r.clamp(0.0, max.max(0.0)) } else { 0.0 };
        Self::new(c(self.top_left), c(self.top_right), c(self.bottom_right), c(self.bottom_left))
    }

    /// `[tl, tr, br, bl]`.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.top_left, self.top_right, self.bottom_right, self.bottom_left]
    }
}
