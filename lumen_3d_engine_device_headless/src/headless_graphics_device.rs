/// HeadlessGraphicsDevice - GraphicsDevice implementation without a GPU
///
/// Validates and records every call instead of executing it. Programs are
/// reflected from their GLSL text, so uniform and attribute lookups behave
/// like on a real driver.

use std::sync::{Arc, Weak};
use lumen_3d_engine::lumen3d::{Error, Result};
use lumen_3d_engine::lumen3d::graphics_device::{
    GraphicsDevice, Config, DeviceStats, Buffer, BufferDesc, Program, ProgramDesc,
    VertexArray, VertexArrayDesc, UniformLocation, UniformValue, PipelineState, Viewport,
    ClearFlags, PrimitiveTopology, IndexType, ShaderStage,
};
use lumen_3d_engine::{engine_debug, engine_error, engine_trace};

use crate::glsl_reflection::{parse_stage, link};
use crate::headless_buffer::HeadlessBuffer;
use crate::headless_program::{HeadlessProgram, HeadlessVertexArray};
use crate::headless_recorder::{Command, HeadlessInspector, Recorder};

/// Headless device
pub struct HeadlessGraphicsDevice {
    config: Config,
    recorder: Arc<Recorder>,
    /// Bindings do not keep resources alive
    current_program: Option<Weak<dyn Program>>,
    current_vertex_array: Option<Weak<dyn VertexArray>>,
    viewport: Viewport,
    size: (u32, u32),
    draw_calls: u64,
    triangles: u64,
}

impl HeadlessGraphicsDevice {
    /// Create a device with the default configuration
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create a device; `config.enable_validation` turns on program validation
    pub fn with_config(config: Config) -> Self {
        engine_debug!("lumen3d::headless", "Headless device created for '{}'", config.app_name);
        Self {
            config,
            recorder: Arc::new(Recorder::default()),
            current_program: None,
            current_vertex_array: None,
            viewport: Viewport::from_size(0, 0),
            size: (0, 0),
            draw_calls: 0,
            triangles: 0,
        }
    }

    /// Handle on the command log and live counters
    pub fn inspector(&self) -> HeadlessInspector {
        HeadlessInspector::new(self.recorder.clone())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Last viewport set
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Surface size given to the last `resize`
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    fn bound_program(&self) -> Result<Arc<dyn Program>> {
        self.current_program
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or_else(|| Error::BackendError("no live program bound".to_string()))
    }

    fn bound_vertex_array(&self) -> Result<Arc<dyn VertexArray>> {
        self.bound_program()?;
        self.current_vertex_array
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or_else(|| Error::BackendError("no live vertex array bound".to_string()))
    }

    fn count_draw(&mut self, topology: PrimitiveTopology, count: u32) {
        self.draw_calls += 1;
        self.triangles += match topology {
            PrimitiveTopology::TriangleList | PrimitiveTopology::TriangleStrip => {
                topology.primitive_count(count) as u64
            }
            PrimitiveTopology::LineList | PrimitiveTopology::PointList => 0,
        };
    }
}

impl Default for HeadlessGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsDevice for HeadlessGraphicsDevice {
    fn create_buffer(&mut self, desc: BufferDesc, data: &[u8]) -> Result<Arc<dyn Buffer>> {
        if desc.size != data.len() as u64 {
            return Err(Error::InvalidResource(format!(
                "buffer '{}': size {} does not match data length {}",
                desc.label,
                desc.size,
                data.len()
            )));
        }
        self.recorder.push(Command::CreateBuffer { label: desc.label.clone(), size: desc.size });
        Ok(Arc::new(HeadlessBuffer::new(desc.label, desc.usage, data, self.recorder.clone())))
    }

    fn create_program(&mut self, desc: ProgramDesc) -> Result<Arc<dyn Program>> {
        let reflection = parse_stage(ShaderStage::Vertex, desc.vertex_source)
            .and_then(|vertex| {
                let fragment = parse_stage(ShaderStage::Fragment, desc.fragment_source)?;
                link(&vertex, &fragment, self.config.enable_validation)
            })
            .inspect_err(|error| {
                engine_error!("lumen3d::headless", "Program '{}' rejected: {}", desc.label, error);
            })?;

        engine_debug!(
            "lumen3d::headless",
            "Program '{}' linked: {} uniforms, {} attributes",
            desc.label,
            reflection.uniforms.len(),
            reflection.attributes.len()
        );
        self.recorder.push(Command::CreateProgram { label: desc.label.to_string() });
        Ok(Arc::new(HeadlessProgram::new(desc.label.to_string(), reflection, self.recorder.clone())))
    }

    fn create_vertex_array(
        &mut self,
        program: &Arc<dyn Program>,
        desc: VertexArrayDesc,
    ) -> Result<Arc<dyn VertexArray>> {
        let mut buffers: Vec<Arc<dyn Buffer>> = Vec::new();
        for attribute in desc.attributes {
            let Some(info) = program.reflection().attribute(&attribute.name) else {
                engine_trace!(
                    "lumen3d::headless",
                    "Program '{}' has no attribute '{}', stream skipped",
                    program.label(),
                    attribute.name
                );
                continue;
            };
            if info.components != attribute.format.component_count() {
                return Err(Error::InvalidResource(format!(
                    "attribute '{}' expects {} components, stream has {}",
                    attribute.name,
                    info.components,
                    attribute.format.component_count()
                )));
            }
            buffers.push(attribute.buffer);
        }

        let attribute_count = buffers.len();
        let index_type = desc.index_buffer.as_ref().map(|(_, index_type)| *index_type);
        if let Some((buffer, _)) = desc.index_buffer {
            buffers.push(buffer);
        }

        self.recorder.push(Command::CreateVertexArray {
            attributes: attribute_count,
            indexed: index_type.is_some(),
        });
        Ok(Arc::new(HeadlessVertexArray {
            attribute_count,
            index_type,
            _buffers: buffers,
        }))
    }

    fn use_program(&mut self, program: &Arc<dyn Program>) -> Result<()> {
        self.recorder.push(Command::UseProgram { label: program.label().to_string() });
        self.current_program = Some(Arc::downgrade(program));
        Ok(())
    }

    fn bind_vertex_array(&mut self, vertex_array: &Arc<dyn VertexArray>) -> Result<()> {
        self.recorder.push(Command::BindVertexArray);
        self.current_vertex_array = Some(Arc::downgrade(vertex_array));
        Ok(())
    }

    fn upload_uniform(&mut self, location: UniformLocation, value: &UniformValue) -> Result<()> {
        let program = self.bound_program()?;
        let info = program.reflection().uniforms.iter()
            .find(|u| u.location == location)
            .ok_or_else(|| Error::InvalidResource(format!(
                "program '{}' has no uniform at location {}",
                program.label(),
                location.0
            )))?;

        if info.uniform_type != value.uniform_type() {
            return Err(Error::InvalidResource(format!(
                "uniform '{}' is {:?}, got {:?}",
                info.name,
                info.uniform_type,
                value.uniform_type()
            )));
        }

        self.recorder.push(Command::UploadUniform { name: info.name.clone(), value: value.clone() });
        Ok(())
    }

    fn set_pipeline_state(&mut self, state: &PipelineState) -> Result<()> {
        self.recorder.push(Command::SetPipelineState {
            blend: state.color_blend.blend_enable,
            depth_write: state.depth.depth_write_enable,
        });
        Ok(())
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        if viewport.width < 0.0 || viewport.height < 0.0 {
            return Err(Error::InvalidResource(format!(
                "negative viewport size {}x{}",
                viewport.width, viewport.height
            )));
        }
        self.viewport = viewport;
        self.recorder.push(Command::SetViewport(viewport));
        Ok(())
    }

    fn clear(&mut self, color: [f32; 4], flags: ClearFlags) -> Result<()> {
        self.recorder.push(Command::Clear { color, flags });
        Ok(())
    }

    fn draw(&mut self, topology: PrimitiveTopology, vertex_count: u32, _first_vertex: u32) -> Result<()> {
        self.bound_vertex_array()?;
        self.count_draw(topology, vertex_count);
        self.recorder.push(Command::Draw { vertex_count });
        Ok(())
    }

    fn draw_indexed(
        &mut self,
        topology: PrimitiveTopology,
        index_count: u32,
        index_type: IndexType,
        _first_index: u32,
    ) -> Result<()> {
        let bound = self.bound_vertex_array()?.index_type();
        if bound != Some(index_type) {
            return Err(Error::InvalidResource(format!(
                "indexed draw with {:?} indices, vertex array has {:?}",
                index_type, bound
            )));
        }
        self.count_draw(topology, index_count);
        self.recorder.push(Command::DrawIndexed { index_count });
        Ok(())
    }

    fn stats(&self) -> DeviceStats {
        DeviceStats {
            draw_calls: self.draw_calls,
            triangles: self.triangles,
            gpu_memory_used: self.inspector().buffer_bytes(),
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.recorder.push(Command::Resize { width, height });
    }
}
