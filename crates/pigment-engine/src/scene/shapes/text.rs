use crate::coords::Vec2;
use crate::paint::Color;
use crate::text::{FontId, TextStyle};

/// Text payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextShape {
    pub text: String,
    /// Explicit font; `None` picks the font registered for `style`.
    pub font: Option<FontId>,
    pub style: TextStyle,
    /// Font size in logical pixels.
    pub size: f32,
    pub color: Color,
    /// Top-left of the text block in logical pixels.
    pub origin: Vec2,
    /// Wrapping width in logical pixels. `None` = no wrapping.
    pub max_width: Option<f32>,
}

impl TextShape {
    pub fn new(text: impl Into<String>, origin: Vec2, size: f32, color: Color) -> Self {
        Self {
            text: text.into(),
            font: None,
            style: TextStyle::REGULAR,
            size,
            color,
            origin,
            max_width: None,
        }
    }

    #[inline]
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    #[inline]
    pub fn with_font(mut self, font: FontId) -> Self {
        self.font = Some(font);
        self
    }

    #[inline]
    pub fn with_max_width(mut self, max_width: f32) -> Self {
        self.max_width = Some(max_width);
        self
    }
}
