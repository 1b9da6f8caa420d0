use super::{Rect, Vec2};

/// Scale + translation affine transform.
///
/// ```text
/// | sx  0  tx |
/// |  0 sy  ty |
/// |  0  0   1 |
/// ```
///
/// Rotation and skew are not representable, so transformed rectangles stay
/// axis-aligned and clip regions remain rectangles in device space.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Transform {
    pub scale: Vec2,
    pub translate: Vec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale: Vec2::new(1.0, 1.0),
        translate: Vec2::new(0.0, 0.0),
    };

    #[inline]
    pub const fn translation(x: f32, y: f32) -> Self {
        Self { scale: Vec2::new(1.0, 1.0), translate: Vec2::new(x, y) }
    }

    #[inline]
    pub const fn scale(sx: f32, sy: f32) -> Self {
        Self { scale: Vec2::new(sx, sy), translate: Vec2::new(0.0, 0.0) }
    }

    #[inline]
    pub const fn uniform_scale(s: f32) -> Self {
        Self::scale(s, s)
    }

    #[inline]
    pub fn is_identity(self) -> bool {
        self == Self::IDENTITY
    }

    /// `self ∘ inner`: applies `inner` first, then `self`.
    ///
    /// Walking a tree, `parent.then(child)` maps child-local coordinates into
    /// the parent's parent space.
    #[inline]
    pub fn then(self, inner: Transform) -> Transform {
        Transform {
            scale: self.scale.mul_elem(inner.scale),
            translate: self.scale.mul_elem(inner.translate) + self.translate,
        }
    }

    #[inline]
    pub fn apply(self, p: Vec2) -> Vec2 {
        self.scale.mul_elem(p) + self.translate
    }

    /// Maps a rectangle; negative scales are normalized so the size stays non-negative.
    #[inline]
    pub fn map_rect(self, r: Rect) -> Rect {
        Rect::from_corners(self.apply(r.min()), self.apply(r.max()))
    }

    /// Scalar used for lengths that have no axis (stroke widths, radii).
    ///
    /// The smaller absolute axis scale, so a stroke never grows beyond what
    /// either axis can hold.
    #[inline]
    pub fn length_scale(self) -> f32 {
        self.scale.x.abs().min(self.scale.y.abs())
    }
}
