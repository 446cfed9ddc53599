/// Mock GraphicsDevice for unit tests (no GPU required)
///
/// Records every command as a string, every uniform upload by name, and
/// counts live buffers. Every uniform name resolves to a location except the
/// names put on the deny list, which lets tests model shader variants that
/// omit some uniforms.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use rustc_hash::FxHashSet;

use crate::graphics_device::{
    GraphicsDevice, DeviceStats, Buffer, BufferDesc, BufferUsage, Program, ProgramDesc,
    ProgramReflection, VertexArray, VertexArrayDesc, UniformLocation, UniformValue,
    PipelineState, Viewport, ClearFlags, PrimitiveTopology, IndexType, ShaderStage,
    AttributeLocation,
};
use crate::error::{Error, Result};

// ============================================================================
// Shared recording state
// ============================================================================

/// Everything the mock device observed, shared with its resources
#[derive(Debug, Default)]
pub struct MockRecord {
    /// Commands in call order ("use_program:phong", "draw_indexed:36", ...)
    pub commands: Vec<String>,
    /// Uniform uploads in call order
    pub uploads: Vec<(String, UniformValue)>,
    /// Labels of compiled programs
    pub programs: Vec<String>,
    /// Uniform names indexed by location
    uniform_names: Vec<String>,
}

impl MockRecord {
    fn location_of(&mut self, name: &str) -> UniformLocation {
        if let Some(index) = self.uniform_names.iter().position(|n| n == name) {
            return UniformLocation(index as u32);
        }
        self.uniform_names.push(name.to_string());
        UniformLocation(self.uniform_names.len() as u32 - 1)
    }

    /// Last value uploaded to `name`
    pub fn last_upload(&self, name: &str) -> Option<&UniformValue> {
        self.uploads.iter().rev().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Number of commands starting with `prefix`
    pub fn count(&self, prefix: &str) -> usize {
        self.commands.iter().filter(|c| c.starts_with(prefix)).count()
    }
}

// ============================================================================
// Mock Buffer
// ============================================================================

#[derive(Debug)]
pub struct MockBuffer {
    pub size: u64,
    pub usage: BufferUsage,
    pub label: String,
    live: Arc<AtomicUsize>,
}

impl Buffer for MockBuffer {
    fn update(&self, offset: u64, data: &[u8]) -> Result<()> {
        if offset + data.len() as u64 > self.size {
            return Err(Error::InvalidResource(format!(
                "update of {} bytes at {} overflows buffer '{}'",
                data.len(),
                offset,
                self.label
            )));
        }
        Ok(())
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn usage(&self) -> BufferUsage {
        self.usage
    }
}

impl Drop for MockBuffer {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Mock Program
// ============================================================================

pub struct MockProgram {
    pub label: String,
    reflection: ProgramReflection,
    record: Arc<Mutex<MockRecord>>,
    denied: Arc<FxHashSet<String>>,
}

impl Program for MockProgram {
    fn reflection(&self) -> &ProgramReflection {
        &self.reflection
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        if self.denied.contains(name) {
            return None;
        }
        self.record.lock().ok().map(|mut record| record.location_of(name))
    }

    fn attribute_location(&self, name: &str) -> Option<AttributeLocation> {
        match name {
            "vertPosition" => Some(AttributeLocation(0)),
            "vertNormal" => Some(AttributeLocation(1)),
            "uv" => Some(AttributeLocation(2)),
            _ => None,
        }
    }
}

// ============================================================================
// Mock VertexArray
// ============================================================================

pub struct MockVertexArray {
    pub attribute_count: usize,
    pub index_type: Option<IndexType>,
    _buffers: Vec<Arc<dyn Buffer>>,
}

impl VertexArray for MockVertexArray {
    fn attribute_count(&self) -> usize {
        self.attribute_count
    }

    fn index_type(&self) -> Option<IndexType> {
        self.index_type
    }
}

// ============================================================================
// Mock GraphicsDevice
// ============================================================================

/// Mock device that records commands without a GPU
pub struct MockGraphicsDevice {
    pub record: Arc<Mutex<MockRecord>>,
    live_buffers: Arc<AtomicUsize>,
    denied: Arc<FxHashSet<String>>,
    fail_compilation: bool,
    stats: DeviceStats,
}

impl MockGraphicsDevice {
    /// Create a mock device resolving every uniform name
    pub fn new() -> Self {
        Self::with_denied_uniforms(&[])
    }

    /// Create a mock device for which `denied` names resolve to no location
    pub fn with_denied_uniforms(denied: &[&str]) -> Self {
        Self {
            record: Arc::new(Mutex::new(MockRecord::default())),
            live_buffers: Arc::new(AtomicUsize::new(0)),
            denied: Arc::new(denied.iter().map(|n| n.to_string()).collect()),
            fail_compilation: false,
            stats: DeviceStats::default(),
        }
    }

    /// Make every following `create_program` fail to compile
    pub fn fail_compilation(mut self) -> Self {
        self.fail_compilation = true;
        self
    }

    /// Number of buffers not yet dropped
    pub fn live_buffers(&self) -> usize {
        self.live_buffers.load(Ordering::SeqCst)
    }

    /// Handle on the live buffer counter, usable after the device is shared
    pub fn live_buffer_counter(&self) -> Arc<AtomicUsize> {
        self.live_buffers.clone()
    }

    fn push(&self, command: String) {
        if let Ok(mut record) = self.record.lock() {
            record.commands.push(command);
        }
    }
}

impl GraphicsDevice for MockGraphicsDevice {
    fn create_buffer(&mut self, desc: BufferDesc, data: &[u8]) -> Result<Arc<dyn Buffer>> {
        if desc.size != data.len() as u64 {
            crate::engine_bail!(
                "lumen3d::mock",
                "create_buffer: size {} does not match data length {}",
                desc.size,
                data.len()
            );
        }
        self.push(format!("create_buffer:{}", desc.label));
        self.live_buffers.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(MockBuffer {
            size: desc.size,
            usage: desc.usage,
            label: desc.label,
            live: self.live_buffers.clone(),
        }))
    }

    fn create_program(&mut self, desc: ProgramDesc) -> Result<Arc<dyn Program>> {
        if self.fail_compilation {
            return Err(Error::ShaderCompilationFailed {
                stage: ShaderStage::Vertex,
                log: "mock compilation failure".to_string(),
            });
        }
        self.push(format!("create_program:{}", desc.label));
        if let Ok(mut record) = self.record.lock() {
            record.programs.push(desc.label.to_string());
        }
        Ok(Arc::new(MockProgram {
            label: desc.label.to_string(),
            reflection: ProgramReflection::empty(),
            record: self.record.clone(),
            denied: self.denied.clone(),
        }))
    }

    fn create_vertex_array(
        &mut self,
        program: &Arc<dyn Program>,
        desc: VertexArrayDesc,
    ) -> Result<Arc<dyn VertexArray>> {
        let mut buffers: Vec<Arc<dyn Buffer>> = Vec::new();
        for attribute in &desc.attributes {
            if program.attribute_location(&attribute.name).is_some() {
                buffers.push(attribute.buffer.clone());
            }
        }
        let attribute_count = buffers.len();
        let index_type = desc.index_buffer.as_ref().map(|(_, t)| *t);
        if let Some((buffer, _)) = desc.index_buffer {
            buffers.push(buffer);
        }
        self.push(format!("create_vertex_array:{}", attribute_count));
        Ok(Arc::new(MockVertexArray {
            attribute_count,
            index_type,
            _buffers: buffers,
        }))
    }

    fn use_program(&mut self, program: &Arc<dyn Program>) -> Result<()> {
        self.push(format!("use_program:{}", program.label()));
        Ok(())
    }

    fn bind_vertex_array(&mut self, _vertex_array: &Arc<dyn VertexArray>) -> Result<()> {
        self.push("bind_vertex_array".to_string());
        Ok(())
    }

    fn upload_uniform(&mut self, location: UniformLocation, value: &UniformValue) -> Result<()> {
        let mut record = self.record.lock()
            .map_err(|_| Error::BackendError("Mock record lock poisoned".to_string()))?;
        let name = record.uniform_names.get(location.0 as usize).cloned()
            .ok_or_else(|| Error::InvalidResource(format!("unknown uniform location {}", location.0)))?;
        record.uploads.push((name, value.clone()));
        Ok(())
    }

    fn set_pipeline_state(&mut self, state: &PipelineState) -> Result<()> {
        let kind = if state.color_blend.blend_enable { "blend" } else { "opaque" };
        self.push(format!("set_pipeline_state:{}", kind));
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.push(format!("set_viewport:{}x{}", viewport.width, viewport.height));
        Ok(())
    }

    fn clear(&mut self, _color: [f32; 4], flags: ClearFlags) -> Result<()> {
        self.push(format!("clear:{}", flags.bits()));
        Ok(())
    }

    fn draw(&mut self, topology: PrimitiveTopology, vertex_count: u32, _first_vertex: u32) -> Result<()> {
        self.stats.draw_calls += 1;
        self.stats.triangles += topology.primitive_count(vertex_count) as u64;
        self.push(format!("draw:{}", vertex_count));
        Ok(())
    }

    fn draw_indexed(
        &mut self,
        topology: PrimitiveTopology,
        index_count: u32,
        _index_type: IndexType,
        _first_index: u32,
    ) -> Result<()> {
        self.stats.draw_calls += 1;
        self.stats.triangles += topology.primitive_count(index_count) as u64;
        self.push(format!("draw_indexed:{}", index_count));
        Ok(())
    }

    fn stats(&self) -> DeviceStats {
        self.stats
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.push(format!("resize:{}x{}", width, height));
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
