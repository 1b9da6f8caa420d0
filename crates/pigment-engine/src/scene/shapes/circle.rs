use crate::coords::Vec2;
use crate::paint::{Color, Stroke};

/// Circle payload.
#[derive(Debug, Clone, PartialEq)]
pub struct CircleShape {
    pub center: Vec2,
    pub radius: f32,
    pub fill: Color,
    pub stroke: Option<Stroke>,
}

impl CircleShape {
    #[inline]
    pub fn new(center: Vec2, radius: f32, fill: Color) -> Self {
        Self { center, radius, fill, stroke: None }
    }

    #[inline]
    pub fn with_stroke(mut self, width: f32, color: Color) -> Self {
        self.stroke = Some(Stroke::new(width, color));
        self
    }
}
