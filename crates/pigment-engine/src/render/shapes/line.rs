use crate::coords::Rect;
use crate::device::Device;
use crate::render::{DrawOutcome, Placement, RenderCtx, RenderError};
use crate::scene::LineShape;
use crate::shader::{ShaderKind, Uniforms};

use super::common::{paint, submit};

/// Renderer for straight segments with butt caps.
///
/// The quad is the segment's bounding box grown by half the width; the
/// program keeps fragments within half the width of the segment.
#[derive(Debug, Default)]
pub struct LineRenderer;

impl LineRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render<D: Device>(
        &mut self,
        ctx: &mut RenderCtx<'_, D>,
        at: &Placement,
        shape: &LineShape,
    ) -> Result<DrawOutcome, RenderError> {
        let width = shape.width * at.transform.length_scale();
        if !(width.is_finite() && width > 0.0) {
            return Ok(DrawOutcome::Skipped);
        }

        let a = at.transform.apply(shape.from);
        let b = at.transform.apply(shape.to);
        if !(a.is_finite() && b.is_finite()) || a.distance(b) == 0.0 {
            return Ok(DrawOutcome::Skipped);
        }

        let quad = Rect::from_corners(a, b).inflate(width * 0.5);

        let mut u = Uniforms::new(ctx.frame);
        u.line = [a.x, a.y, b.x, b.y];
        u.fill = paint(shape.color, at.opacity);
        u.stroke_width = width;

        submit(ctx, at.clip, ShaderKind::Line, quad, u, None)
    }
}
