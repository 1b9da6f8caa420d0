//! GLSL programs: descriptions, profile emission, caching and a CPU mirror.

pub mod eval;
pub mod library;

mod cache;
mod error;
mod kind;
mod source;
mod uniforms;

pub use cache::ProgramCache;
pub use error::{ShaderError, ShaderStage};
pub use kind::{Profile, ProgramKey, ShaderKind};
pub use source::{emit, header, Decl, GlslType, ProgramSource, ShaderDesc, POSITION_ATTRIBUTE};
pub use uniforms::{UniformValue, Uniforms};
