use thiserror::Error;

use crate::shader::ShaderKind;

/// Failure reported by the rendering device. Aborts the current frame.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("{kind} draw has no texture bound")]
    MissingTexture { kind: ShaderKind },

    #[error("GL error 0x{code:04X} in {op}")]
    Gl { op: &'static str, code: u32 },

    #[error("could not create {what}: {reason}")]
    Create { what: &'static str, reason: String },

    #[error("draw failed: {0}")]
    Draw(String),

    #[error("present failed: {0}")]
    Present(String),
}
