use crate::coords::{Rect, Vec2};
use crate::device::Device;
use crate::paint::Color;
use crate::render::{DrawOutcome, Placement, RenderCtx, RenderError};
use crate::scene::CircleShape;
use crate::shader::{ShaderKind, Uniforms};

use super::common::{paint, submit};

/// Renderer for circles. The quad is the circle's bounding square; the
/// program discards outside the radius and strokes the outer ring.
#[derive(Debug, Default)]
pub struct CircleRenderer;

impl CircleRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render<D: Device>(
        &mut self,
        ctx: &mut RenderCtx<'_, D>,
        at: &Placement,
        shape: &CircleShape,
    ) -> Result<DrawOutcome, RenderError> {
        let s = at.transform.length_scale();
        let radius = shape.radius * s;
        if !(radius.is_finite() && radius > 0.0) || !shape.center.is_finite() {
            return Ok(DrawOutcome::Skipped);
        }

        let center = at.transform.apply(shape.center);
        let bounds = Rect::from_origin_size(center - Vec2::splat(radius), Vec2::splat(radius * 2.0));

        let (stroke_width, stroke_color) = match &shape.stroke {
            Some(st) => (st.clamped_width() * s, st.color),
            None => (0.0, Color::transparent()),
        };

        let mut u = Uniforms::new(ctx.frame);
        u.bounds = bounds.to_array();
        u.fill = paint(shape.fill, at.opacity);
        u.stroke = paint(stroke_color, at.opacity);
        u.stroke_width = stroke_width;

        submit(ctx, at.clip, ShaderKind::Circle, bounds, u, None)
    }
}
