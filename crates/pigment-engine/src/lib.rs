//! Pigment engine crate.
//!
//! GPU painter core: turns a retained tree of drawing primitives into draw
//! calls against a [`device::Device`], caching shader programs and textures
//! for the lifetime of the rendering context.

pub mod clip;
pub mod coords;
pub mod device;
pub mod frame;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
pub mod shader;
pub mod text;
pub mod texture;
pub mod time;

pub use device::{Device, GlDevice, SoftDevice};
pub use frame::{FrameError, FrameReport, Painter, PainterConfig};
pub use scene::{Node, Primitive, SharedScene};
