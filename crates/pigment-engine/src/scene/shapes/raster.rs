use std::fmt;
use std::sync::Arc;

use crate::coords::Rect;

use super::image::ResourceId;

/// Pixel generator for a raster: `(width, height)` in device pixels →
/// straight-alpha RGBA8 image of exactly that size.
pub type RasterFn = Arc<dyn Fn(u32, u32) -> image::RgbaImage + Send + Sync>;

/// Procedurally generated pixels covering `rect`.
///
/// The generator runs whenever the device-pixel size of the node changes or
/// `revision` is bumped; otherwise the cached texture is reused.
#[derive(Clone)]
pub struct RasterShape {
    pub rect: Rect,
    pub id: ResourceId,
    pub revision: u64,
    pub generator: RasterFn,
}

impl RasterShape {
    pub fn new<F>(rect: Rect, id: ResourceId, generator: F) -> Self
    where
        F: Fn(u32, u32) -> image::RgbaImage + Send + Sync + 'static,
    {
        Self { rect, id, revision: 0, generator: Arc::new(generator) }
    }

    #[inline]
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }
}

impl fmt::Debug for RasterShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterShape")
            .field("rect", &self.rect)
            .field("id", &self.id)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}
