//! Fonts and glyph-run rasterization (fontdue).

mod font_system;

pub use font_system::{FontId, FontLoadError, FontSystem, RunBitmap, RunTooLarge, TextStyle};
