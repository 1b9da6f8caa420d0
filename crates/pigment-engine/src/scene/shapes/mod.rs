//! Shape payloads, one file per primitive kind.
//!
//! Each shape is plain data read by exactly one renderer under
//! `render::shapes::*`.

pub(crate) mod circle;
pub(crate) mod image;
pub(crate) mod line;
pub(crate) mod raster;
pub(crate) mod rect;
pub(crate) mod text;
