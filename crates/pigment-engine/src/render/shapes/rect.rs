use crate::device::Device;
use crate::paint::Color;
use crate::render::{DrawOutcome, Placement, RenderCtx, RenderError};
use crate::scene::RectangleShape;
use crate::shader::{ShaderKind, Uniforms};

use super::common::{paint, submit};

/// Renderer for rectangles, square or rounded.
///
/// Picks `ShaderKind::RoundedRectangle` when any corner radius survives
/// clamping, `ShaderKind::Rectangle` otherwise. Strokes are drawn inside the
/// bounds: the outer `stroke_width` device pixels take the stroke color.
#[derive(Debug, Default)]
pub struct RectRenderer;

impl RectRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render<D: Device>(
        &mut self,
        ctx: &mut RenderCtx<'_, D>,
        at: &Placement,
        shape: &RectangleShape,
    ) -> Result<DrawOutcome, RenderError> {
        let local = shape.rect.clamped();
        if local.is_empty() {
            return Ok(DrawOutcome::Skipped);
        }

        let bounds = at.transform.map_rect(local);
        if bounds.is_empty() {
            return Ok(DrawOutcome::Skipped);
        }

        let s = at.transform.length_scale();
        let radii = shape
            .radii
            .scaled(s)
            .clamped(bounds.width().min(bounds.height()) * 0.5);

        let (stroke_width, stroke_color) = match &shape.stroke {
            Some(st) => (st.clamped_width() * s, st.color),
            None => (0.0, Color::transparent()),
        };

        let kind = if radii.is_zero() { ShaderKind::Rectangle } else { ShaderKind::RoundedRectangle };

        let mut u = Uniforms::new(ctx.frame);
        u.bounds = bounds.to_array();
        u.radii = radii.to_array();
        u.fill = paint(shape.fill, at.opacity);
        u.stroke = paint(stroke_color, at.opacity);
        u.stroke_width = stroke_width;

        submit(ctx, at.clip, kind, bounds, u, None)
    }
}
