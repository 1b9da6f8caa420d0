use std::collections::HashMap;

use crate::coords::{Rect, Vec2};
use crate::device::{Device, TextureFormat};
use crate::render::{DrawOutcome, Placement, RenderCtx, RenderError};
use crate::scene::TextShape;
use crate::shader::{ShaderKind, Uniforms};
use crate::texture::{ContentId, TextRunKey, TextureError, TextureManager};

use super::common::{paint, submit};

/// Renderer for text runs.
///
/// Each run is laid out and rasterized by fontdue into one `Alpha8` coverage
/// texture, cached by the texture manager under font, style, pixel size,
/// text and wrap width, and drawn as a single quad tinted with the text
/// color.
#[derive(Debug, Default)]
pub struct TextRenderer {
    /// Bitmap top-left relative to the run origin, per resident run texture.
    offsets: HashMap<ContentId, Vec2>,
    warned_no_font: bool,
}

impl TextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render<D: Device>(
        &mut self,
        ctx: &mut RenderCtx<'_, D>,
        at: &Placement,
        shape: &TextShape,
    ) -> Result<DrawOutcome, RenderError> {
        if shape.text.is_empty() {
            return Ok(DrawOutcome::Skipped);
        }

        let Some(font) = ctx.fonts.resolve(shape.font, shape.style) else {
            if !self.warned_no_font {
                log::warn!("TextRenderer: no font for {:?}, skipping text", shape.style);
                self.warned_no_font = true;
            }
            return Ok(DrawOutcome::Skipped);
        };

        let s = at.transform.length_scale();
        let run = TextRunKey::new(font, shape.style, shape.size * s, &shape.text, shape.max_width.map(|w| w * s));
        if run.size_q == 0 {
            return Ok(DrawOutcome::Skipped);
        }
        let px = run.px();
        let max_width = run.max_width.map(|w| w as f32);
        let key = ContentId::Text(run);

        let cached = match (ctx.textures.get(&key), self.offsets.get(&key)) {
            (Some(handle), Some(&offset)) => Some((handle, offset)),
            _ => None,
        };
        let (handle, offset) = match cached {
            Some(hit) => hit,
            None => {
                let limit = ctx.textures.max_dimension(ctx.device.max_texture_dimension());
                let run = ctx.fonts.rasterize_run(font, &shape.text, px, max_width, limit).map_err(|e| {
                    TextureError::TooLarge {
                        width: u32::try_from(e.width).unwrap_or(u32::MAX),
                        height: u32::try_from(e.height).unwrap_or(u32::MAX),
                        max: e.max,
                    }
                })?;
                let Some(bitmap) = run else {
                    return Ok(DrawOutcome::Skipped);
                };
                let handle = ctx.textures.upload(
                    ctx.device,
                    key.clone(),
                    &bitmap.coverage,
                    bitmap.width,
                    bitmap.height,
                    TextureFormat::Alpha8,
                )?;
                self.offsets.insert(key, bitmap.offset);
                (handle, bitmap.offset)
            }
        };

        // Snap to whole device pixels so coverage is sampled texel-exact.
        let origin = at.transform.apply(shape.origin) + offset;
        let quad = Rect::new(
            origin.x.round(),
            origin.y.round(),
            handle.width as f32,
            handle.height as f32,
        );

        let mut u = Uniforms::new(ctx.frame);
        u.bounds = quad.to_array();
        u.fill = paint(shape.color, at.opacity);

        submit(ctx, at.clip, ShaderKind::Text, quad, u, Some(&handle))
    }

    /// Forgets offsets of runs whose textures are gone.
    pub fn retain_resident<D: Device>(&mut self, textures: &TextureManager<D>) {
        self.offsets.retain(|key, _| textures.contains(key));
    }
}
