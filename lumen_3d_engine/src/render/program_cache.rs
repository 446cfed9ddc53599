/// Compiled program cache keyed by shader content.
///
/// One program per distinct (vertex, fragment) source pair, shared by every
/// render item drawn with it. Programs live until the cache is cleared.

use std::hash::{Hash, Hasher};
use std::sync::Arc;
use rustc_hash::{FxHashMap, FxHasher};
use crate::error::Result;
use crate::graphics_device::{GraphicsDevice, Program, ProgramDesc};
use crate::resource::ShaderSource;

/// Content hash of a shader source pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProgramKey(u64);

impl ProgramKey {
    pub fn from_source(source: &ShaderSource) -> Self {
        let mut hasher = FxHasher::default();
        source.vertex.hash(&mut hasher);
        source.fragment.hash(&mut hasher);
        ProgramKey(hasher.finish())
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Default)]
pub struct ProgramCache {
    programs: FxHashMap<ProgramKey, Arc<dyn Program>>,
}

impl ProgramCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached program for `source`, compiling it on first use
    ///
    /// Compilation failures are returned as is and nothing is cached.
    pub fn get_or_compile(
        &mut self,
        device: &mut dyn GraphicsDevice,
        source: &ShaderSource,
        label: &str,
    ) -> Result<(ProgramKey, Arc<dyn Program>)> {
        let key = ProgramKey::from_source(source);
        if let Some(program) = self.programs.get(&key) {
            crate::engine_trace!("lumen3d::ProgramCache", "Cache hit for program '{}'", label);
            return Ok((key, Arc::clone(program)));
        }

        let program = device.create_program(ProgramDesc {
            vertex_source: source.vertex,
            fragment_source: source.fragment,
            label,
        }).map_err(|error| {
            crate::engine_error!("lumen3d::ProgramCache", "Failed to build program '{}': {}", label, error);
            error
        })?;

        crate::engine_debug!("lumen3d::ProgramCache", "Compiled program '{}' ({:016x})", label, key.0);
        self.programs.insert(key, Arc::clone(&program));
        Ok((key, program))
    }

    pub fn get(&self, key: ProgramKey) -> Option<&Arc<dyn Program>> {
        self.programs.get(&key)
    }

    pub fn contains(&self, key: ProgramKey) -> bool {
        self.programs.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// Drop every cached program
    pub fn clear(&mut self) {
        self.programs.clear();
    }
}

#[cfg(test)]
#[path = "program_cache_tests.rs"]
mod tests;
