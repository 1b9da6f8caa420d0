//! Rendering device seam.
//!
//! Everything above this module talks to a [`Device`]; [`GlDevice`] drives a
//! real GL / GLES context through `glow`, [`SoftDevice`] is a CPU reference
//! device used for headless rendering and tests.

mod draw;
mod error;
mod gl;
mod soft;

pub use draw::{quad_vertices, DrawCall, QuadVertex, ScissorRect, TextureDesc, TextureFormat};
pub use error::DeviceError;
pub use gl::{GlDevice, GlProgram, GlTexture};
pub use soft::{SoftDevice, SoftProgram, SoftStats, SoftTexture};

use crate::coords::FrameSize;
use crate::paint::Color;
use crate::shader::{ProgramSource, Profile, ShaderError};

pub trait Device {
    type Program;
    type Texture;

    /// Precision profile the device's shading language expects.
    fn profile(&self) -> Profile;

    /// Largest texture edge the device accepts.
    fn max_texture_dimension(&self) -> u32;

    /// Compiles and links both stages. Synchronous.
    fn compile_program(&mut self, source: &ProgramSource) -> Result<Self::Program, ShaderError>;

    fn delete_program(&mut self, program: Self::Program);

    /// Uploads `pixels` (exactly `desc.byte_len()` bytes, rows top to bottom).
    fn create_texture(
        &mut self,
        desc: TextureDesc,
        pixels: &[u8],
    ) -> Result<Self::Texture, DeviceError>;

    fn delete_texture(&mut self, texture: Self::Texture);

    /// Binds the default target, sets the viewport and blend state, and
    /// disables scissoring.
    fn begin_frame(&mut self, size: FrameSize);

    fn clear(&mut self, color: Color);

    /// `None` disables scissoring.
    fn set_scissor(&mut self, scissor: Option<ScissorRect>);

    fn draw(
        &mut self,
        program: &Self::Program,
        call: &DrawCall<'_, Self::Texture>,
    ) -> Result<(), DeviceError>;

    fn present(&mut self) -> Result<(), DeviceError>;
}
