//! Primitive renderers.
//!
//! Each renderer turns one scene primitive into exactly one device draw call.
//!
//! Convention:
//! - Scene geometry is in logical pixels (top-left origin, +Y down).
//! - `Placement::transform` maps it to device pixels; every uniform and quad
//!   handed to the device is in device pixels, UI orientation.
//! - Programs flip `gl_FragCoord.y` against the frame height themselves.

mod ctx;
mod error;
pub mod shapes;

pub use ctx::{Placement, RenderCtx};
pub use error::{DrawOutcome, RenderError};
pub use shapes::Renderers;
