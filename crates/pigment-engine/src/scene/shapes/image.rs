use std::sync::Arc;

use crate::coords::Rect;

/// Stable identity of an image or raster resource.
///
/// Texture cache entries are keyed by this id; the pixels behind an id may
/// change, which is signalled by bumping the owning shape's revision.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u64);

impl ResourceId {
    /// Derives an id from a resource name (FNV-1a), stable across runs.
    pub fn named(name: &str) -> Self {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        for b in name.bytes() {
            h ^= u64::from(b);
            h = h.wrapping_mul(0x0100_0000_01b3);
        }
        Self(h)
    }
}

/// Decoded image pixels (straight-alpha RGBA8) plus identity.
#[derive(Debug, Clone)]
pub struct ImageSource {
    pub id: ResourceId,
    /// Bumped by the owner whenever `pixels` change.
    pub revision: u64,
    pub pixels: Arc<image::RgbaImage>,
}

impl ImageSource {
    #[inline]
    pub fn from_rgba(id: ResourceId, pixels: image::RgbaImage) -> Self {
        Self { id, revision: 0, pixels: Arc::new(pixels) }
    }

    /// Decodes an encoded image (PNG, JPEG, ...) into RGBA8.
    pub fn decode(id: ResourceId, bytes: &[u8]) -> Result<Self, image::ImageError> {
        let pixels = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self::from_rgba(id, pixels))
    }

    /// Replaces the pixels and bumps the revision.
    pub fn replace(&mut self, pixels: image::RgbaImage) {
        self.pixels = Arc::new(pixels);
        self.revision = self.revision.wrapping_add(1);
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}

impl PartialEq for ImageSource {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.revision == other.revision
    }
}

/// Image payload: `source` stretched over `rect`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageShape {
    pub rect: Rect,
    pub source: ImageSource,
}

impl ImageShape {
    #[inline]
    pub fn new(rect: Rect, source: ImageSource) -> Self {
        Self { rect, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_ids_are_stable_and_distinct() {
        assert_eq!(ResourceId::named("logo.png"), ResourceId::named("logo.png"));
        assert_ne!(ResourceId::named("logo.png"), ResourceId::named("icon.png"));
    }

    #[test]
    fn replace_bumps_revision() {
        let mut src = ImageSource::from_rgba(ResourceId(1), image::RgbaImage::new(2, 2));
        src.replace(image::RgbaImage::new(4, 4));
        assert_eq!(src.revision, 1);
        assert_eq!(src.dimensions(), (4, 4));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(ImageSource::decode(ResourceId(1), b"nope").is_err());
    }
}
