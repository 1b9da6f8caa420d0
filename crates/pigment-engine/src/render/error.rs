use thiserror::Error;

use crate::device::DeviceError;
use crate::shader::ShaderError;
use crate::texture::TextureError;

/// Why a primitive could not be drawn. The frame reacts to each source
/// differently.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    #[error(transparent)]
    Device(#[from] DeviceError),
}

/// Result of rendering one node.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DrawOutcome {
    Drawn,
    /// Nothing to draw: zero-area geometry, fully clipped, no visible glyphs.
    Skipped,
}
