//! GPU texture residency: content keys, LRU budget, frame pinning.

mod key;
mod manager;

pub use crate::device::TextureFormat;
pub use key::{ContentId, TextRunKey};
pub use manager::{TextureError, TextureHandle, TextureManager, TextureStats};
