use crate::coords::{FrameSize, Rect, Transform};
use crate::device::Device;
use crate::shader::{ProgramCache, Profile};
use crate::text::FontSystem;
use crate::texture::TextureManager;

/// Renderer-facing context: the device plus the context-owned caches.
pub struct RenderCtx<'a, D: Device> {
    pub device: &'a mut D,
    pub programs: &'a mut ProgramCache<D>,
    pub textures: &'a mut TextureManager<D>,
    pub fonts: &'a FontSystem,
    pub profile: Profile,
    pub frame: FrameSize,
}

/// Where a node lands: effective state of the clip/transform stack plus the
/// accumulated opacity.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Placement {
    /// Node-local → device pixels.
    pub transform: Transform,
    /// Device pixels. `None` = unclipped.
    pub clip: Option<Rect>,
    pub opacity: f32,
}

impl Placement {
    #[inline]
    pub fn new(transform: Transform, clip: Option<Rect>, opacity: f32) -> Self {
        Self { transform, clip, opacity }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::new(Transform::IDENTITY, None, 1.0)
    }
}
