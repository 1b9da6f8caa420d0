use std::collections::HashMap;

use crate::device::{Device, TextureFormat};
use crate::render::{DrawOutcome, Placement, RenderCtx, RenderError};
use crate::scene::{RasterShape, ResourceId};
use crate::shader::{ShaderKind, Uniforms};
use crate::texture::{ContentId, TextureError, TextureManager};

use super::common::{premultiply, submit};

/// Renderer for procedural rasters.
///
/// The generator runs at the node's device-pixel size. A size change evicts
/// the texture generated for the previous size.
#[derive(Debug, Default)]
pub struct RasterRenderer {
    last_size: HashMap<ResourceId, (u32, u32)>,
}

impl RasterRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render<D: Device>(
        &mut self,
        ctx: &mut RenderCtx<'_, D>,
        at: &Placement,
        shape: &RasterShape,
    ) -> Result<DrawOutcome, RenderError> {
        let local = shape.rect.clamped();
        let bounds = at.transform.map_rect(local);
        let w = bounds.width().round() as u32;
        let h = bounds.height().round() as u32;
        if local.is_empty() || w == 0 || h == 0 {
            return Ok(DrawOutcome::Skipped);
        }

        if let Some(&(pw, ph)) = self.last_size.get(&shape.id) {
            if (pw, ph) != (w, h) {
                let stale = ContentId::Raster { id: shape.id, width: pw, height: ph };
                ctx.textures.evict(ctx.device, &stale);
            }
        }
        self.last_size.insert(shape.id, (w, h));

        let key = ContentId::Raster { id: shape.id, width: w, height: h };
        let handle = match ctx.textures.get(&key) {
            Some(t) if t.revision == shape.revision => t,
            _ => {
                log::debug!("RasterRenderer: generating {:?} rev {} at {w}x{h}", shape.id, shape.revision);
                let img = (shape.generator)(w, h);
                if img.dimensions() != (w, h) {
                    return Err(TextureError::SizeMismatch {
                        expected: w as usize * h as usize * 4,
                        actual: img.as_raw().len(),
                    }
                    .into());
                }
                let pixels = premultiply(img.as_raw());
                ctx.textures.upload_revision(
                    ctx.device,
                    key,
                    shape.revision,
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

        submit(ctx, at.clip, ShaderKind::Raster, bounds, u, Some(&handle))
    }

    /// Forgets sizes of rasters whose textures are gone (evicted, or never
    /// uploaded because generation failed).
    pub fn retain_resident<D: Device>(&mut self, textures: &TextureManager<D>) {
        self.last_size
            .retain(|&id, &mut (width, height)| textures.contains(&ContentId::Raster { id, width, height }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::{FrameSize, Rect};
    use crate::device::SoftDevice;
    use crate::shader::{ProgramCache, Profile};
    use crate::text::FontSystem;

    fn solid(w: u32, h: u32) -> image::RgbaImage {
        image::RgbaImage::from_pixel(w, h, image::Rgba([0, 0, 255, 255]))
    }

    #[test]
    fn sizes_of_evicted_rasters_are_forgotten() {
        let mut device = SoftDevice::default();
        let mut programs = ProgramCache::new();
        let mut textures = TextureManager::new(1 << 20, 1024);
        let fonts = FontSystem::new();
        let mut raster = RasterRenderer::new();

        let a = RasterShape::new(Rect::new(0.0, 0.0, 4.0, 4.0), ResourceId(1), solid);
        let b = RasterShape::new(Rect::new(0.0, 0.0, 2.0, 2.0), ResourceId(2), solid);

        textures.begin_frame();
        {
            let mut ctx = RenderCtx {
                device: &mut device,
                programs: &mut programs,
                textures: &mut textures,
                fonts: &fonts,
                profile: Profile::Desktop,
                frame: FrameSize::new(4, 4),
            };
            let at = Placement::default();
            assert_eq!(raster.render(&mut ctx, &at, &a).unwrap(), DrawOutcome::Drawn);
            assert_eq!(raster.render(&mut ctx, &at, &b).unwrap(), DrawOutcome::Drawn);
        }
        textures.end_frame(&mut device);
        raster.retain_resident(&textures);
        assert_eq!(raster.last_size.len(), 2);

        textures.evict(&mut device, &ContentId::Raster { id: ResourceId(1), width: 4, height: 4 });
        raster.retain_resident(&textures);
        assert_eq!(raster.last_size.len(), 1);
        assert!(raster.last_size.contains_key(&ResourceId(2)));
    }

    #[test]
    fn generator_with_wrong_size_leaves_no_entry_after_pruning() {
        let mut device = SoftDevice::default();
        let mut programs = ProgramCache::new();
        let mut textures = TextureManager::new(1 << 20, 1024);
        let fonts = FontSystem::new();
        let mut raster = RasterRenderer::new();
        let bad = RasterShape::new(Rect::new(0.0, 0.0, 4.0, 4.0), ResourceId(7), |_, _| solid(1, 1));

        textures.begin_frame();
        let mut ctx = RenderCtx {
            device: &mut device,
            programs: &mut programs,
            textures: &mut textures,
            fonts: &fonts,
            profile: Profile::Desktop,
            frame: FrameSize::new(4, 4),
        };
        let err = raster.render(&mut ctx, &Placement::default(), &bad).unwrap_err();
        assert!(matches!(err, RenderError::Texture(TextureError::SizeMismatch { .. })));

        textures.end_frame(&mut device);
        raster.retain_resident(&textures);
        assert!(raster.last_size.is_empty());
    }
}
