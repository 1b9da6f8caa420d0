use super::Vec2;

/// Axis-aligned rectangle (top-left origin, +Y down).
///
/// Used both for node geometry in logical pixels and for clip regions in
/// device pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub const fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self { origin, size }
    }

    /// Builds the rectangle spanned by two corners, in any order.
    #[inline]
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b);
        let max = a.max(b);
        Self::from_origin_size(min, max - min)
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn width(self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(self) -> f32 {
        self.size.y
    }

    /// True for zero-area, negative or non-finite rectangles.
    #[inline]
    pub fn is_empty(self) -> bool {
        !(self.size.x > 0.0 && self.size.y > 0.0)
    }

    /// Same area with non-negative extents; a negative width or height
    /// moves the origin instead.
    #[inline]
    pub fn normalized(self) -> Self {
        Self::from_corners(self.min(), self.max())
    }

    /// Clamps negative or non-finite extents to zero, keeping the origin.
    ///
    /// Malformed scene geometry goes through this so it collapses to a
    /// zero-area rect instead of being mirrored.
    #[inline]
    pub fn clamped(self) -> Self {
        let clamp = |v: f32| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        let origin = if self.origin.is_finite() { self.origin } else { Vec2::zero() };
        Rect::from_origin_size(origin, Vec2::new(clamp(self.size.x), clamp(self.size.y)))
    }

    /// Overlap of two rectangles, `None` when they do not overlap with positive area.
    #[inline]
    pub fn intersect(self, other: Rect) -> Option<Rect> {
        let r = self.intersect_or_empty(other);
        if r.is_empty() { None } else { Some(r) }
    }

    /// Overlap of two rectangles; disjoint inputs produce a zero-area rect.
    ///
    /// Width and height are never negative.
    #[inline]
    pub fn intersect_or_empty(self, other: Rect) -> Rect {
        let (a, b) = (self.normalized(), other.normalized());
        let lo = a.min().max(b.min());
        let hi = a.max().min(b.max()).max(lo);
        Rect::from_origin_size(lo, hi - lo)
    }

    /// Grows (positive `d`) or shrinks (negative `d`) the rect on all sides.
    #[inline]
    pub fn inflate(self, d: f32) -> Rect {
        Rect::new(
            self.origin.x - d,
            self.origin.y - d,
            (self.size.x + 2.0 * d).max(0.0),
            (self.size.y + 2.0 * d).max(0.0),
        )
    }

    /// `[x, y, w, h]`, the layout used by shader uniforms.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.origin.x, self.origin.y, self.size.x, self.size.y]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── shape fixing ──────────────────────────────────────────────────────

    #[test]
    fn normalized_moves_origin_for_negative_extent() {
        assert_eq!(Rect::new(10.0, 4.0, -4.0, -2.0).normalized(), Rect::new(6.0, 2.0, 4.0, 2.0));
    }

    #[test]
    fn clamped_negative_size_collapses_to_zero_area() {
        let c = Rect::new(10.0, 20.0, -4.0, 5.0).clamped();
        assert_eq!(c, Rect::new(10.0, 20.0, 0.0, 5.0));
        assert!(c.is_empty());
    }

    #[test]
    fn clamped_non_finite_is_empty_at_origin() {
        let c = Rect::new(f32::INFINITY, 1.0, f32::NAN, 5.0).clamped();
        assert!(c.is_empty());
        assert_eq!(c.origin, Vec2::zero());
    }

    #[test]
    fn corners_in_any_order() {
        let a = Rect::from_corners(Vec2::new(10.0, 2.0), Vec2::new(4.0, 8.0));
        assert_eq!(a, Rect::new(4.0, 2.0, 6.0, 6.0));
        assert_eq!(a.max(), Vec2::new(10.0, 8.0));
    }

    // ── overlap ───────────────────────────────────────────────────────────

    #[test]
    fn overlap_of_clip_pair() {
        let i = Rect::new(0.0, 0.0, 50.0, 50.0).intersect(Rect::new(25.0, 25.0, 50.0, 50.0));
        assert_eq!(i, Some(Rect::new(25.0, 25.0, 25.0, 25.0)));
    }

    #[test]
    fn shared_edge_has_no_overlap() {
        assert_eq!(Rect::new(0.0, 0.0, 10.0, 10.0).intersect(Rect::new(10.0, 0.0, 10.0, 10.0)), None);
    }

    #[test]
    fn disjoint_overlap_is_zero_area_not_negative() {
        let i = Rect::new(0.0, 0.0, 5.0, 5.0).intersect_or_empty(Rect::new(20.0, 30.0, 5.0, 5.0));
        assert_eq!(i.size, Vec2::zero());
        assert!(i.is_empty());
    }

    #[test]
    fn inflate_grows_and_never_goes_negative() {
        assert_eq!(Rect::new(2.0, 2.0, 4.0, 4.0).inflate(1.0), Rect::new(1.0, 1.0, 6.0, 6.0));
        assert_eq!(Rect::new(0.0, 0.0, 4.0, 4.0).inflate(-3.0).size, Vec2::zero());
    }

    #[test]
    fn uniform_layout() {
        assert_eq!(Rect::new(1.0, 2.0, 3.0, 4.0).to_array(), [1.0, 2.0, 3.0, 4.0]);
    }
}
