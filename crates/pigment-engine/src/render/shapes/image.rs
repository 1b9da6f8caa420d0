use crate::device::{Device, TextureFormat};
use crate::render::{DrawOutcome, Placement, RenderCtx, RenderError};
use crate::scene::ImageShape;
use crate::shader::{ShaderKind, Uniforms};
use crate::texture::ContentId;

use super::common::{premultiply, submit};

/// Renderer for decoded images.
///
/// Pixels are premultiplied and uploaded once per `(resource, revision)`;
/// later frames reuse the resident texture until it is evicted or the source
/// revision changes.
#[derive(Debug, Default)]
pub struct ImageRenderer;

impl ImageRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render<D: Device>(
        &mut self,
        ctx: &mut RenderCtx<'_, D>,
        at: &Placement,
        shape: &ImageShape,
    ) -> Result<DrawOutcome, RenderError> {
        let local = shape.rect.clamped();
        let bounds = at.transform.map_rect(local);
        if local.is_empty() || bounds.is_empty() {
            return Ok(DrawOutcome::Skipped);
        }

        let source = &shape.source;
        let key = ContentId::Image(source.id);
        let handle = match ctx.textures.get(&key) {
            Some(h) if h.revision == source.revision => h,
            _ => {
                let (w, h) = source.dimensions();
                log::debug!("ImageRenderer: uploading {:?} rev {} ({w}x{h})", source.id, source.revision);
                let pixels = premultiply(source.pixels.as_raw());
                ctx.textures.upload_revision(
                    ctx.device,
                    key,
                    source.revision,
                    &pixels,
                    w,
                    h,
                    TextureFormat::Rgba8,
                )?
            }
        };

        let mut u = Uniforms::new(ctx.frame);
        u.bounds = bounds.to_array();
        u.fill = [at.opacity.clamp(0.0, 1.0); 4];

        submit(ctx, at.clip, ShaderKind::Image, bounds, u, Some(&handle))
    }
}
