use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::{debug, info};

use crate::device::Device;

use super::error::ShaderError;
use super::kind::{Profile, ProgramKey, ShaderKind};
use super::library::describe;
use super::source::emit;

/// Compiled programs, one per `(kind, profile)`.
///
/// Lives as long as the rendering context. Compilation happens on first
/// request and is never repeated; a failure is returned to the caller and
/// nothing is cached for that key.
pub struct ProgramCache<D: Device> {
    programs: HashMap<ProgramKey, D::Program>,
    compiles: usize,
}

impl<D: Device> Default for ProgramCache<D> {
    fn default() -> Self {
        Self { programs: HashMap::new(), compiles: 0 }
    }
}

impl<D: Device> ProgramCache<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_program(
        &mut self,
        device: &mut D,
        kind: ShaderKind,
        profile: Profile,
    ) -> Result<&D::Program, ShaderError> {
        match self.programs.entry(ProgramKey::new(kind, profile)) {
            Entry::Occupied(e) => Ok(e.into_mut()),
            Entry::Vacant(e) => {
                let source = emit(describe(kind), profile);
                debug!(
                    "shader: compiling {kind} ({profile}), {} + {} bytes",
                    source.vertex.len(),
                    source.fragment.len()
                );
                let program = device.compile_program(&source)?;
                self.compiles += 1;
                info!("shader: compiled {kind} program ({profile})");
                Ok(e.insert(program))
            }
        }
    }

    pub fn contains(&self, kind: ShaderKind, profile: Profile) -> bool {
        self.programs.contains_key(&ProgramKey::new(kind, profile))
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Successful compilations over the cache lifetime.
    pub fn compile_count(&self) -> usize {
        self.compiles
    }

    /// Releases every program. Called at context teardown.
    pub fn clear(&mut self, device: &mut D) {
        let n = self.programs.len();
        for (_, program) in self.programs.drain() {
            device.delete_program(program);
        }
        if n > 0 {
            debug!("shader: released {n} programs");
        }
    }
}
