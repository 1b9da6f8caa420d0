//! Frame coordination: owns the device and caches, walks the scene and
//! presents.

mod config;
mod error;
mod painter;
mod report;

pub use config::PainterConfig;
pub use error::FrameError;
pub use painter::Painter;
pub use report::FrameReport;
