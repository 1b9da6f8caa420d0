use crate::coords::{CornerRadii, Rect};
use crate::paint::{Color, Stroke};

/// Rectangle payload, optionally rounded and stroked.
#[derive(Debug, Clone, PartialEq)]
pub struct RectangleShape {
    pub rect: Rect,
    pub radii: CornerRadii,
    pub fill: Color,
    pub stroke: Option<Stroke>,
}

impl RectangleShape {
    #[inline]
    pub fn new(rect: Rect, fill: Color) -> Self {
        Self { rect, radii: CornerRadii::zero(), fill, stroke: None }
    }

    #[inline]
    pub fn with_stroke(mut self, width: f32, color: Color) -> Self {
        self.stroke = Some(Stroke::new(width, color));
        self
    }

    #[inline]
    pub fn with_radii(mut self, radii: CornerRadii) -> Self {
        self.radii = radii;
        self
    }

    /// Uniform corner radius.
    #[inline]
    pub fn with_radius(self, radius: f32) -> Self {
        self.with_radii(CornerRadii::all(radius))
    }
}
