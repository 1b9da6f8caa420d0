//! Coordinate and geometry types shared by the scene, the clip stack and renderers.
//!
//! Canonical CPU space:
//! - origin top-left
//! - +X right, +Y down
//! - scene geometry in logical pixels, clips and draw geometry in device pixels
//!
//! Shaders flip Y against the frame height to match the GPU's bottom-left origin.

mod corner_radii;
mod frame_size;
mod rect;
mod transform;
mod vec2;

pub use corner_radii::CornerRadii;
pub use frame_size::FrameSize;
pub use rect::Rect;
pub use transform::Transform;
pub use vec2::Vec2;
