//! Scene tree types.
//!
//! Responsibilities:
//! - renderer-agnostic primitive payloads (`scene::shapes`)
//! - the node tree with per-node transform, clip and opacity
//! - publication/snapshot of whole trees across threads

mod node;
mod shared;

pub mod shapes;

pub use node::{Node, Primitive};
pub use shapes::circle::CircleShape;
pub use shapes::image::{ImageShape, ImageSource, ResourceId};
pub use shapes::line::LineShape;
pub use shapes::raster::{RasterFn, RasterShape};
pub use shapes::rect::RectangleShape;
pub use shapes::text::TextShape;
pub use shared::{SceneSnapshot, SharedScene};
