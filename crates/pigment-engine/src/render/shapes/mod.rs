//! Shape renderers, one per primitive kind.

mod common;

pub mod circle;
pub mod image;
pub mod line;
pub mod raster;
pub mod rect;
pub mod text;

pub use circle::CircleRenderer;
pub use image::ImageRenderer;
pub use line::LineRenderer;
pub use raster::RasterRenderer;
pub use rect::RectRenderer;
pub use text::TextRenderer;

/// One renderer of each kind, owned by the painter.
#[derive(Debug, Default)]
pub struct Renderers {
    pub rect: RectRenderer,
    pub circle: CircleRenderer,
    pub line: LineRenderer,
    pub image: ImageRenderer,
    pub raster: RasterRenderer,
    pub text: TextRenderer,
}

impl Renderers {
    pub fn new() -> Self {
        Self::default()
    }
}
