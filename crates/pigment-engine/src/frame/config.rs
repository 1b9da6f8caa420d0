use crate::paint::Color;
use crate::shader::Profile;

/// Painter configuration.
///
/// Keep this structure small. Add fields only when an embedder needs to tune
/// something concrete.
#[derive(Debug, Clone, PartialEq)]
pub struct PainterConfig {
    /// Upper bound for resident texture bytes, enforced at frame end.
    pub texture_budget_bytes: usize,

    /// Largest accepted texture edge. The device limit applies as well.
    pub max_texture_dimension: u32,

    /// Color the frame is cleared to (premultiplied).
    pub clear_color: Color,

    /// Forces a shader profile instead of the one the device reports.
    pub profile: Option<Profile>,
}

impl Default for PainterConfig {
    fn default() -> Self {
        Self {
            texture_budget_bytes: 64 * 1024 * 1024,
            max_texture_dimension: 4096,
            clear_color: Color::transparent(),
            profile: None,
        }
    }
}
