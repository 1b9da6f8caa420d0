use std::collections::HashSet;

use log::{debug, warn};
use lru::LruCache;
use thiserror::Error;

use crate::device::{Device, DeviceError, TextureDesc, TextureFormat};

use super::key::ContentId;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("texture has zero size ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("pixel data is {actual} bytes, expected {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    #[error("{width}x{height} exceeds the maximum texture dimension {max}")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error("{bytes} bytes exceeds the texture budget of {budget} bytes")]
    OverBudget { bytes: usize, budget: usize },

    #[error("upload failed: {0}")]
    Device(#[from] DeviceError),
}

/// Checked-out reference to a resident texture.
///
/// Cheap to clone. Resolve it with [`TextureManager::texture`]; once the
/// content is replaced or evicted the handle resolves to `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureHandle {
    serial: u64,
    key: ContentId,
    pub revision: u64,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub bytes: usize,
}

impl TextureHandle {
    #[inline]
    pub fn key(&self) -> &ContentId {
        &self.key
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TextureStats {
    pub uploads: u64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

struct Resident<T> {
    serial: u64,
    revision: u64,
    texture: T,
    desc: TextureDesc,
    bytes: usize,
}

/// GPU texture cache keyed by content identity.
///
/// Least-recently-used textures are evicted when resident bytes exceed the
/// budget. Textures checked out during a frame are pinned: they are never
/// destroyed before `end_frame`, even when replaced or evicted.
pub struct TextureManager<D: Device> {
    entries: LruCache<ContentId, Resident<D::Texture>>,
    /// Replaced or evicted while pinned; freed at `end_frame`.
    retired: Vec<Resident<D::Texture>>,
    pinned: HashSet<u64>,
    in_frame: bool,

    resident_bytes: usize,
    budget: usize,
    max_dimension: u32,

    next_serial: u64,
    stats: TextureStats,
}

impl<D: Device> TextureManager<D> {
    pub fn new(budget: usize, max_dimension: u32) -> Self {
        Self {
            entries: LruCache::unbounded(),
            retired: Vec::new(),
            pinned: HashSet::new(),
            in_frame: false,
            resident_bytes: 0,
            budget,
            max_dimension,
            next_serial: 1,
            stats: TextureStats::default(),
        }
    }

    // ── lookup ────────────────────────────────────────────────────────────

    /// Returns the current handle for `key`, marking it most recently used.
    /// Inside a frame the texture is pinned until `end_frame`.
    pub fn get(&mut self, key: &ContentId) -> Option<TextureHandle> {
        let Some(entry) = self.entries.get(key) else {
            self.stats.misses += 1;
            return None;
        };
        self.stats.hits += 1;
        let handle = handle_of(key, entry);
        if self.in_frame {
            self.pinned.insert(handle.serial);
        }
        Some(handle)
    }

    /// Resolves a handle. Stale handles resolve to `None`.
    pub fn texture(&self, handle: &TextureHandle) -> Option<&D::Texture> {
        self.entries
            .peek(&handle.key)
            .filter(|e| e.serial == handle.serial)
            .map(|e| &e.texture)
    }

    pub fn contains(&self, key: &ContentId) -> bool {
        self.entries.contains(key)
    }

    // ── mutation ──────────────────────────────────────────────────────────

    /// Uploads `pixels` as the content of `key` (revision 0).
    pub fn upload(
        &mut self,
        device: &mut D,
        key: ContentId,
        pixels: &[u8],
        width: u32,
        height: u32,
        format: TextureFormat,
    ) -> Result<TextureHandle, TextureError> {
        self.upload_revision(device, key, 0, pixels, width, height, format)
    }

    /// Uploads `pixels` for `key`, replacing any previous content.
    ///
    /// Least-recently-used unpinned textures are evicted first to make room.
    #[allow(clippy::too_many_arguments)]
    pub fn upload_revision(
        &mut self,
        device: &mut D,
        key: ContentId,
        revision: u64,
        pixels: &[u8],
        width: u32,
        height: u32,
        format: TextureFormat,
    ) -> Result<TextureHandle, TextureError> {
        let desc = TextureDesc::new(width, height, format);
        self.validate(&desc, pixels, device.max_texture_dimension())?;
        let bytes = desc.byte_len();

        if let Some(old) = self.entries.pop(&key) {
            self.release(device, old);
        }
        self.evict_until(device, self.budget.saturating_sub(bytes));

        let texture = device.create_texture(desc, pixels)?;
        let serial = self.next_serial;
        self.next_serial += 1;

        let entry = Resident { serial, revision, texture, desc, bytes };
        let handle = handle_of(&key, &entry);
        self.entries.put(key, entry);
        self.resident_bytes += bytes;
        self.stats.uploads += 1;

        if self.in_frame {
            self.pinned.insert(serial);
        }
        if self.resident_bytes > self.budget {
            debug!(
                "texture: {} resident bytes over budget {} while pinned; trimming at frame end",
                self.resident_bytes, self.budget
            );
        }
        Ok(handle)
    }

    /// Drops the texture for `key`. Returns whether one was resident.
    pub fn evict(&mut self, device: &mut D, key: &ContentId) -> bool {
        match self.entries.pop(key) {
            Some(entry) => {
                self.stats.evictions += 1;
                self.release(device, entry);
                true
            }
            None => false,
        }
    }

    // ── frame lifecycle ───────────────────────────────────────────────────

    pub fn begin_frame(&mut self) {
        if self.in_frame {
            warn!("texture: begin_frame without end_frame");
        }
        self.in_frame = true;
    }

    /// Releases pins, frees retired textures and trims to the budget.
    pub fn end_frame(&mut self, device: &mut D) {
        self.in_frame = false;
        self.pinned.clear();
        for old in self.retired.drain(..) {
            self.resident_bytes -= old.bytes;
            device.delete_texture(old.texture);
        }
        self.evict_until(device, self.budget);
    }

    /// Frees everything. Used at context teardown.
    pub fn clear(&mut self, device: &mut D) {
        self.pinned.clear();
        self.in_frame = false;
        while let Some((_, entry)) = self.entries.pop_lru() {
            device.delete_texture(entry.texture);
        }
        for old in self.retired.drain(..) {
            device.delete_texture(old.texture);
        }
        self.resident_bytes = 0;
    }

    /// Changes the budget. Takes effect on the next upload or `end_frame`.
    pub fn set_budget(&mut self, budget: usize) {
        self.budget = budget;
    }

    // ── accessors ─────────────────────────────────────────────────────────

    pub fn resident_bytes(&self) -> usize {
        self.resident_bytes
    }

    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Largest texture edge accepted, given the device limit as well.
    pub fn max_dimension(&self, device_max: u32) -> u32 {
        self.max_dimension.min(device_max)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> TextureStats {
        self.stats
    }

    // ── private helpers ───────────────────────────────────────────────────

    fn validate(&self, desc: &TextureDesc, pixels: &[u8], device_max: u32) -> Result<(), TextureError> {
        let TextureDesc { width, height, .. } = *desc;
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }
        let expected = desc.byte_len();
        if pixels.len() != expected {
            return Err(TextureError::SizeMismatch { expected, actual: pixels.len() });
        }
        let max = self.max_dimension(device_max);
        if width > max || height > max {
            return Err(TextureError::TooLarge { width, height, max });
        }
        if expected > self.budget {
            return Err(TextureError::OverBudget { bytes: expected, budget: self.budget });
        }
        Ok(())
    }

    /// Pinned textures go to the retired list; the rest are freed now.
    fn release(&mut self, device: &mut D, entry: Resident<D::Texture>) {
        if self.pinned.contains(&entry.serial) {
            self.retired.push(entry);
        } else {
            self.resident_bytes -= entry.bytes;
            device.delete_texture(entry.texture);
        }
    }

    fn evict_until(&mut self, device: &mut D, target: usize) {
        while self.resident_bytes > target {
            let victim = self
                .entries
                .iter()
                .rev()
                .find(|(_, e)| !self.pinned.contains(&e.serial))
                .map(|(k, _)| k.clone());
            let Some(key) = victim else {
                break;
            };
            if let Some(entry) = self.entries.pop(&key) {
                debug!("texture: evicting {:?} ({} bytes)", key, entry.bytes);
                self.stats.evictions += 1;
                self.release(device, entry);
            }
        }
    }
}

fn handle_of<T>(key: &ContentId, entry: &Resident<T>) -> TextureHandle {
    TextureHandle {
        serial: entry.serial,
        key: key.clone(),
        revision: entry.revision,
        width: entry.desc.width,
        height: entry.desc.height,
        format: entry.desc.format,
        bytes: entry.bytes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::SoftDevice;
    use crate::scene::ResourceId;

    fn image(n: u64) -> ContentId {
        ContentId::Image(ResourceId(n))
    }

    /// 4x4 RGBA = 64 bytes.
    fn px() -> Vec<u8> {
        vec![255; 64]
    }

    fn setup(budget: usize) -> (SoftDevice, TextureManager<SoftDevice>) {
        (SoftDevice::default(), TextureManager::new(budget, 4096))
    }

    // ── replacement ───────────────────────────────────────────────────────

    #[test]
    fn reupload_replaces_and_invalidates() {
        let (mut dev, mut tm) = setup(1024);
        let old = tm.upload(&mut dev, image(1), &px(), 4, 4, TextureFormat::Rgba8).unwrap();
        let new = tm.upload(&mut dev, image(1), &px(), 4, 4, TextureFormat::Rgba8).unwrap();

        assert!(tm.texture(&old).is_none());
        assert!(tm.texture(&new).is_some());
        assert_eq!(tm.get(&image(1)), Some(new));
        assert_eq!(tm.len(), 1);
        assert_eq!(tm.resident_bytes(), 64);
        assert_eq!(dev.stats().textures_live, 1);
    }

    #[test]
    fn revision_is_carried_on_the_handle() {
        let (mut dev, mut tm) = setup(1024);
        tm.upload_revision(&mut dev, image(1), 3, &px(), 4, 4, TextureFormat::Rgba8).unwrap();
        assert_eq!(tm.get(&image(1)).map(|h| h.revision), Some(3));
    }

    // ── eviction ──────────────────────────────────────────────────────────

    #[test]
    fn lru_eviction_keeps_budget() {
        let (mut dev, mut tm) = setup(128);
        tm.upload(&mut dev, image(1), &px(), 4, 4, TextureFormat::Rgba8).unwrap();
        tm.upload(&mut dev, image(2), &px(), 4, 4, TextureFormat::Rgba8).unwrap();
        // touch 1 so 2 becomes least recently used
        assert!(tm.get(&image(1)).is_some());
        tm.upload(&mut dev, image(3), &px(), 4, 4, TextureFormat::Rgba8).unwrap();

        assert!(tm.contains(&image(1)));
        assert!(!tm.contains(&image(2)));
        assert!(tm.contains(&image(3)));
        assert!(tm.resident_bytes() <= tm.budget());
        assert_eq!(tm.stats().evictions, 1);
        assert_eq!(dev.stats().textures_live, 2);
    }

    #[test]
    fn pinned_textures_survive_until_frame_end() {
        let (mut dev, mut tm) = setup(128);
        tm.begin_frame();
        let a = tm.upload(&mut dev, image(1), &px(), 4, 4, TextureFormat::Rgba8).unwrap();
        let b = tm.upload(&mut dev, image(2), &px(), 4, 4, TextureFormat::Rgba8).unwrap();
        let c = tm.upload(&mut dev, image(3), &px(), 4, 4, TextureFormat::Rgba8).unwrap();

        // all three pinned: nothing could be evicted
        assert!(tm.texture(&a).is_some());
        assert!(tm.texture(&b).is_some());
        assert!(tm.texture(&c).is_some());
        assert_eq!(tm.resident_bytes(), 192);

        tm.end_frame(&mut dev);
        assert!(tm.resident_bytes() <= tm.budget());
        assert_eq!(tm.len(), 2);
        assert!(!tm.contains(&image(1)));
        assert_eq!(dev.stats().textures_live, 2);
    }

    #[test]
    fn replaced_pinned_texture_is_freed_at_frame_end() {
        let (mut dev, mut tm) = setup(1024);
        tm.begin_frame();
        tm.upload(&mut dev, image(1), &px(), 4, 4, TextureFormat::Rgba8).unwrap();
        tm.upload(&mut dev, image(1), &px(), 4, 4, TextureFormat::Rgba8).unwrap();
        assert_eq!(dev.stats().textures_live, 2);
        assert_eq!(tm.resident_bytes(), 128);

        tm.end_frame(&mut dev);
        assert_eq!(dev.stats().textures_live, 1);
        assert_eq!(tm.resident_bytes(), 64);
    }

    #[test]
    fn lowered_budget_trims_at_frame_end() {
        let (mut dev, mut tm) = setup(1024);
        tm.begin_frame();
        for n in 1..=4 {
            tm.upload(&mut dev, image(n), &px(), 4, 4, TextureFormat::Rgba8).unwrap();
        }
        tm.set_budget(128);
        assert_eq!(tm.len(), 4);

        tm.end_frame(&mut dev);
        assert_eq!(tm.budget(), 128);
        assert_eq!(tm.resident_bytes(), 128);
        assert!(tm.contains(&image(3)));
        assert!(tm.contains(&image(4)));
        assert_eq!(dev.stats().textures_live, 2);
    }

    #[test]
    fn explicit_evict() {
        let (mut dev, mut tm) = setup(1024);
        let h = tm.upload(&mut dev, image(1), &px(), 4, 4, TextureFormat::Rgba8).unwrap();
        assert!(tm.evict(&mut dev, &image(1)));
        assert!(!tm.evict(&mut dev, &image(1)));
        assert!(tm.texture(&h).is_none());
        assert_eq!(tm.resident_bytes(), 0);
    }

    // ── validation ────────────────────────────────────────────────────────

    #[test]
    fn rejects_bad_uploads() {
        let (mut dev, mut tm) = setup(100);
        let empty = tm.upload(&mut dev, image(1), &[], 0, 4, TextureFormat::Rgba8);
        assert!(matches!(empty, Err(TextureError::Empty { .. })));

        let short = tm.upload(&mut dev, image(1), &[0; 10], 4, 4, TextureFormat::Rgba8);
        assert!(matches!(short, Err(TextureError::SizeMismatch { expected: 64, actual: 10 })));

        let big = tm.upload(&mut dev, image(1), &[0; 144], 12, 12, TextureFormat::Alpha8);
        assert!(matches!(big, Err(TextureError::OverBudget { bytes: 144, budget: 100 })));

        let mut tm = TextureManager::<SoftDevice>::new(1 << 20, 8);
        let wide = tm.upload(&mut dev, image(1), &[0; 16], 16, 1, TextureFormat::Alpha8);
        assert!(matches!(wide, Err(TextureError::TooLarge { max: 8, .. })));
        assert_eq!(dev.stats().textures_created, 0);
    }

    #[test]
    fn device_failure_is_a_texture_error() {
        let (mut dev, mut tm) = setup(1024);
        dev.fail_next_upload();
        let err = tm.upload(&mut dev, image(1), &px(), 4, 4, TextureFormat::Rgba8);
        assert!(matches!(err, Err(TextureError::Device(_))));
        assert!(tm.is_empty());
        assert_eq!(tm.resident_bytes(), 0);
    }

    #[test]
    fn clear_frees_everything() {
        let (mut dev, mut tm) = setup(1024);
        tm.begin_frame();
        tm.upload(&mut dev, image(1), &px(), 4, 4, TextureFormat::Rgba8).unwrap();
        tm.upload(&mut dev, image(1), &px(), 4, 4, TextureFormat::Rgba8).unwrap();
        tm.clear(&mut dev);
        assert_eq!(dev.stats().textures_live, 0);
        assert_eq!(tm.resident_bytes(), 0);
    }
}
