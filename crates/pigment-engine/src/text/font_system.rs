use std::collections::HashMap;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle as LayoutStyle};

use crate::coords::Vec2;

/// Error returned by [`FontSystem::load_font`].
#[derive(Debug, Clone, thiserror::Error)]
#[error("font load error: {0}")]
pub struct FontLoadError(pub String);

/// A laid-out run whose bitmap would exceed the texture size limit.
#[derive(Debug, Copy, Clone, PartialEq, Eq, thiserror::Error)]
#[error("text run of {width}x{height} px exceeds max dimension {max}")]
pub struct RunTooLarge {
    pub width: u64,
    pub height: u64,
    pub max: u32,
}

/// Opaque handle to a font loaded into a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

impl FontId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Style flags of a text run.
///
/// The theme maps each combination to a font; the flags are also part of the
/// glyph texture key, so restyling a run never reuses stale coverage.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub monospace: bool,
    pub symbol: bool,
}

impl TextStyle {
    pub const REGULAR: TextStyle =
        TextStyle { bold: false, italic: false, monospace: false, symbol: false };

    #[inline]
    pub const fn bold() -> Self {
        Self { bold: true, ..Self::REGULAR }
    }

    #[inline]
    pub const fn italic() -> Self {
        Self { italic: true, ..Self::REGULAR }
    }

    #[inline]
    pub const fn monospace() -> Self {
        Self { monospace: true, ..Self::REGULAR }
    }
}

/// Coverage bitmap of one laid-out text run (one byte per pixel).
#[derive(Debug, Clone, PartialEq)]
pub struct RunBitmap {
    pub width: u32,
    pub height: u32,
    /// Top-left of the bitmap relative to the run origin, in device pixels.
    pub offset: Vec2,
    pub coverage: Vec<u8>,
}

/// Owns a collection of loaded fonts and the style → font table.
///
/// Fonts are immutable after loading. The system is owned by the painter and
/// handed to the text renderer each frame so runs can be rasterized on demand.
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
    style_fonts: HashMap<TextStyle, FontId>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self { fonts: Vec::new(), style_fonts: HashMap::new() }
    }

    /// Parses and stores a TrueType or OpenType font from raw bytes.
    ///
    /// The first loaded font becomes the regular-style fallback.
    pub fn load_font(&mut self, bytes: &[u8]) -> Result<FontId, FontLoadError> {
        let font = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|e| FontLoadError(e.to_string()))?;
        let id = FontId(self.fonts.len());
        self.fonts.push(font);
        self.style_fonts.entry(TextStyle::REGULAR).or_insert(id);
        log::debug!("loaded font {:?}", id);
        Ok(id)
    }

    /// Assigns the font used for `style` when a run does not name one explicitly.
    pub fn set_style_font(&mut self, style: TextStyle, id: FontId) {
        self.style_fonts.insert(style, id);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    /// Picks the font for a run: explicit font, then the style table, then the
    /// regular font.
    pub fn resolve(&self, explicit: Option<FontId>, style: TextStyle) -> Option<FontId> {
        if let Some(id) = explicit {
            return self.get(id).map(|_| id);
        }
        self.style_fonts
            .get(&style)
            .or_else(|| self.style_fonts.get(&TextStyle::REGULAR))
            .copied()
    }

    /// Returns a reference to the underlying `fontdue::Font`, if `id` is valid.
    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Lays out `text` at `px` device pixels and rasterizes every glyph into
    /// one coverage bitmap.
    ///
    /// Returns `Ok(None)` for unknown fonts and for runs without visible
    /// glyphs (empty strings, whitespace only). Runs whose extent exceeds
    /// `max_dimension` are rejected from the layout alone, before any glyph
    /// is rasterized.
    pub fn rasterize_run(
        &self,
        id: FontId,
        text: &str,
        px: f32,
        max_width: Option<f32>,
        max_dimension: u32,
    ) -> Result<Option<RunBitmap>, RunTooLarge> {
        let Some(font) = self.get(id) else {
            return Ok(None);
        };
        if text.is_empty() || !(px.is_finite() && px > 0.0) {
            return Ok(None);
        }

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings { max_width, ..LayoutSettings::default() });
        layout.append(&[font], &LayoutStyle::new(text, px, 0));

        let glyphs: Vec<_> = layout
            .glyphs()
            .iter()
            .filter(|g| g.char_data.rasterize() && g.width > 0 && g.height > 0)
            .map(|g| (g.key, g.x.round() as i64, g.y.round() as i64, g.width as i64, g.height as i64))
            .collect();

        let (Some(min_x), Some(min_y), Some(max_x), Some(max_y)) = (
            glyphs.iter().map(|g| g.1).min(),
            glyphs.iter().map(|g| g.2).min(),
            glyphs.iter().map(|g| g.1 + g.3).max(),
            glyphs.iter().map(|g| g.2 + g.4).max(),
        ) else {
            return Ok(None);
        };

        let (w, h) = ((max_x - min_x).max(1), (max_y - min_y).max(1));
        let max = i64::from(max_dimension);
        if w > max || h > max {
            return Err(RunTooLarge { width: w as u64, height: h as u64, max: max_dimension });
        }
        let (width, height) = (w as u32, h as u32);
        let mut coverage = vec![0u8; width as usize * height as usize];

        for (key, gx, gy, _, _) in glyphs {
            let (metrics, bitmap) = font.rasterize_config(key);
            let ox = (gx - min_x) as usize;
            let oy = (gy - min_y) as usize;
            for row in 0..metrics.height {
                let dy = oy + row;
                if dy >= height as usize {
                    break;
                }
                for col in 0..metrics.width {
                    let dx = ox + col;
                    if dx >= width as usize {
                        break;
                    }
                    let dst = &mut coverage[dy * width as usize + dx];
                    *dst = (*dst).max(bitmap[row * metrics.width + col]);
                }
            }
        }

        Ok(Some(RunBitmap {
            width,
            height,
            offset: Vec2::new(min_x as f32, min_y as f32),
            coverage,
        }))
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_fail_to_load() {
        let mut fonts = FontSystem::new();
        assert!(fonts.load_font(b"definitely not a font").is_err());
        assert!(fonts.is_empty());
    }

    #[test]
    fn resolve_without_fonts_is_none() {
        let fonts = FontSystem::new();
        assert_eq!(fonts.resolve(None, TextStyle::bold()), None);
        assert_eq!(fonts.resolve(Some(FontId(3)), TextStyle::REGULAR), None);
    }

    #[test]
    fn unknown_font_rasterizes_nothing() {
        let fonts = FontSystem::new();
        assert_eq!(fonts.rasterize_run(FontId(0), "hi", 16.0, None, 4096), Ok(None));
    }

    // ── with a system font ────────────────────────────────────────────────

    fn system_font(name: &str) -> Option<Vec<u8>> {
        ["/usr/share/fonts/truetype/dejavu", "/usr/share/fonts/TTF", "/usr/share/fonts/dejavu"]
            .iter()
            .find_map(|dir| std::fs::read(format!("{dir}/{name}")).ok())
    }

    #[test]
    fn oversized_run_is_rejected_before_rasterizing() {
        let Some(bytes) = system_font("DejaVuSans.ttf") else {
            eprintln!("no system font available; skipping");
            return;
        };
        let mut fonts = FontSystem::new();
        let id = fonts.load_font(&bytes).unwrap();

        let err = fonts.rasterize_run(id, "W", 100_000.0, None, 4096).unwrap_err();
        assert_eq!(err.max, 4096);
        assert!(err.width > 4096 || err.height > 4096);

        let run = fonts.rasterize_run(id, "W", 16.0, None, 4096).unwrap().unwrap();
        assert!(run.width <= 4096 && run.height <= 4096);
        assert_eq!(run.coverage.len(), (run.width * run.height) as usize);
    }

    #[test]
    fn non_finite_size_rasterizes_nothing() {
        let Some(bytes) = system_font("DejaVuSans.ttf") else {
            return;
        };
        let mut fonts = FontSystem::new();
        let id = fonts.load_font(&bytes).unwrap();
        assert_eq!(fonts.rasterize_run(id, "W", f32::INFINITY, None, 4096), Ok(None));
    }

    #[test]
    fn bold_runs_resolve_through_style_table() {
        let (Some(regular), Some(bold)) = (system_font("DejaVuSans.ttf"), system_font("DejaVuSans-Bold.ttf"))
        else {
            eprintln!("no system font available; skipping");
            return;
        };
        let mut fonts = FontSystem::new();
        let r = fonts.load_font(&regular).unwrap();
        let b = fonts.load_font(&bold).unwrap();

        // first load becomes the regular default; later loads do not replace it
        assert_eq!(fonts.resolve(None, TextStyle::bold()), Some(r));
        fonts.set_style_font(TextStyle::bold(), b);
        assert_eq!(fonts.resolve(None, TextStyle::bold()), Some(b));
        assert_eq!(fonts.resolve(None, TextStyle::REGULAR), Some(r));
        // styles without an entry fall back to regular
        assert_eq!(fonts.resolve(None, TextStyle::italic()), Some(r));
        // explicit font wins over the table
        assert_eq!(fonts.resolve(Some(r), TextStyle::bold()), Some(r));
    }

    #[test]
    fn styles_are_distinct_keys() {
        assert_ne!(TextStyle::bold(), TextStyle::italic());
        assert_eq!(TextStyle::default(), TextStyle::REGULAR);
    }
}
