use thiserror::Error;

use crate::device::DeviceError;
use crate::shader::ShaderError;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error("rendering context is lost")]
    ContextLost,

    #[error("invalid frame size {width}x{height} at scale {scale}")]
    InvalidSize { width: u32, height: u32, scale: f32 },

    /// The rest of the frame was skipped and nothing was presented.
    #[error("frame {frame} aborted at node {node}: {source}")]
    Device {
        frame: u64,
        node: usize,
        #[source]
        source: DeviceError,
    },

    /// Fatal: the painter refuses further frames.
    #[error("frame {frame}: program compilation failed: {source}")]
    Shader {
        frame: u64,
        #[source]
        source: ShaderError,
    },

    #[error("frame {frame}: present failed: {source}")]
    Present {
        frame: u64,
        #[source]
        source: DeviceError,
    },
}
