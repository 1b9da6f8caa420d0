use crate::scene::ResourceId;
use crate::text::{FontId, TextStyle};

/// Identity of texture content.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum ContentId {
    /// Decoded image resource. Revisions replace the texture in place.
    Image(ResourceId),
    /// Procedural raster at a specific device-pixel size.
    Raster { id: ResourceId, width: u32, height: u32 },
    /// Rasterized text run.
    Text(TextRunKey),
}

/// Everything that changes the pixels of a text run.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct TextRunKey {
    pub font: FontId,
    pub style: TextStyle,
    /// Pixel size in quarter device pixels.
    pub size_q: u32,
    pub text: String,
    /// Wrap width in whole device pixels.
    pub max_width: Option<u32>,
}

impl TextRunKey {
    pub fn new(font: FontId, style: TextStyle, px: f32, text: &str, max_width: Option<f32>) -> Self {
        Self {
            font,
            style,
            size_q: quantize(px, 4.0),
            text: text.to_owned(),
            max_width: max_width.map(|w| quantize(w, 1.0)),
        }
    }

    /// The pixel size the key stands for.
    #[inline]
    pub fn px(&self) -> f32 {
        self.size_q as f32 / 4.0
    }
}

#[inline]
fn quantize(v: f32, steps: f32) -> u32 {
    if v.is_finite() && v > 0.0 {
        (v * steps).round() as u32
    } else {
        0
    }
}
