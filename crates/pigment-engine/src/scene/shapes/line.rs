use crate::coords::Vec2;
use crate::paint::Color;

/// Straight line segment with butt caps.
#[derive(Debug, Clone, PartialEq)]
pub struct LineShape {
    pub from: Vec2,
    pub to: Vec2,
    pub width: f32,
    pub color: Color,
}

impl LineShape {
    #[inline]
    pub fn new(from: Vec2, to: Vec2, width: f32, color: Color) -> Self {
        Self { from, to, width, color }
    }
}
