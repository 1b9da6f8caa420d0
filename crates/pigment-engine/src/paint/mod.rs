//! Paint model shared between the scene and renderers.
//!
//! Scope:
//! - color representation (linear premultiplied alpha)
//! - stroke description for outlined shapes
//!
//! Geometry types remain in `coords`.

pub mod color;

pub use color::Color;

/// Stroke drawn inside the outer edge of a shape.
///
/// `width` is in the same space as the shape geometry (logical pixels);
/// renderers scale it to device pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
}

impl Stroke {
    #[inline]
    pub fn new(width: f32, color: Color) -> Self {
        Self { width, color }
    }

    /// Width clamped to a non-negative finite value.
    #[inline]
    pub fn clamped_width(&self) -> f32 {
        if self.width.is_finite() { self.width.max(0.0) } else { 0.0 }
    }
}
