use std::fmt;

use thiserror::Error;

use super::kind::{Profile, ShaderKind};

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

/// Program compilation failure. Fatal to the rendering context.
#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("{kind} program ({profile}): {stage} stage failed to compile: {log}")]
    Compile {
        kind: ShaderKind,
        profile: Profile,
        stage: ShaderStage,
        log: String,
    },

    #[error("{kind} program ({profile}): link failed: {log}")]
    Link {
        kind: ShaderKind,
        profile: Profile,
        log: String,
    },

    #[error("{kind} program ({profile}): could not create GL object: {reason}")]
    Create {
        kind: ShaderKind,
        profile: Profile,
        reason: String,
    },
}

impl ShaderError {
    pub fn kind(&self) -> ShaderKind {
        match self {
            ShaderError::Compile { kind, .. }
            | ShaderError::Link { kind, .. }
            | ShaderError::Create { kind, .. } => *kind,
        }
    }
}
