/// GraphicsDevice trait - the GPU boundary consumed by the renderer

use std::sync::Arc;
use std::sync::Mutex;
use std::collections::HashMap;
use winit::window::Window;

use crate::error::{Error, Result};
use crate::graphics_device::{
    Buffer, BufferDesc, Program, ProgramDesc, VertexArray, VertexArrayDesc,
    UniformLocation, UniformValue, PipelineState, Viewport, ClearFlags,
    PrimitiveTopology, IndexType,
};

// ============================================================================
// Configuration and statistics
// ============================================================================

/// Device configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Enable validation/debug checks in the backend
    pub enable_validation: bool,
    /// Application name
    pub app_name: String,
    /// Application version (major, minor, patch)
    pub app_version: (u32, u32, u32),
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enable_validation: cfg!(debug_assertions),
            app_name: "Lumen3D Application".to_string(),
            app_version: (1, 0, 0),
        }
    }
}

/// Cumulative device statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceStats {
    /// Number of draw calls issued
    pub draw_calls: u64,
    /// Number of triangles drawn
    pub triangles: u64,
    /// GPU memory held by live buffers (bytes)
    pub gpu_memory_used: u64,
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// Main device trait
///
/// Factory for GPU resources and immediate-mode command sink. Commands apply
/// to the currently bound program and vertex array, in call order.
/// Implemented by backend-specific devices (e.g. the headless device).
pub trait GraphicsDevice: Send + Sync {
    /// Create a buffer filled with `data`
    ///
    /// # Arguments
    ///
    /// * `desc` - Buffer descriptor (`desc.size` must equal `data.len()`)
    /// * `data` - Initial contents
    fn create_buffer(&mut self, desc: BufferDesc, data: &[u8]) -> Result<Arc<dyn Buffer>>;

    /// Compile both stages, link and validate a program
    ///
    /// # Errors
    ///
    /// `ShaderCompilationFailed`, `ProgramLinkFailed` or
    /// `ProgramValidationFailed`, carrying the backend log.
    fn create_program(&mut self, desc: ProgramDesc) -> Result<Arc<dyn Program>>;

    /// Bind vertex streams to the attribute slots of `program`
    ///
    /// Streams naming an attribute the program does not use are skipped.
    fn create_vertex_array(
        &mut self,
        program: &Arc<dyn Program>,
        desc: VertexArrayDesc,
    ) -> Result<Arc<dyn VertexArray>>;

    /// Make `program` the current program
    fn use_program(&mut self, program: &Arc<dyn Program>) -> Result<()>;

    /// Make `vertex_array` the current vertex array
    fn bind_vertex_array(&mut self, vertex_array: &Arc<dyn VertexArray>) -> Result<()>;

    /// Upload a value to a uniform of the current program
    fn upload_uniform(&mut self, location: UniformLocation, value: &UniformValue) -> Result<()>;

    /// Apply fixed-function state for the following draws
    fn set_pipeline_state(&mut self, state: &PipelineState) -> Result<()>;

    /// Set the viewport rectangle
    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    /// Clear the selected planes of the frame buffer
    ///
    /// # Arguments
    ///
    /// * `color` - Normalized RGBA clear color
    /// * `flags` - Planes to clear
    fn clear(&mut self, color: [f32; 4], flags: ClearFlags) -> Result<()>;

    /// Non-indexed draw from the current vertex array
    fn draw(&mut self, topology: PrimitiveTopology, vertex_count: u32, first_vertex: u32) -> Result<()>;

    /// Indexed draw from the current vertex array's index buffer
    fn draw_indexed(
        &mut self,
        topology: PrimitiveTopology,
        index_count: u32,
        index_type: IndexType,
        first_index: u32,
    ) -> Result<()>;

    /// Get statistics about the device
    fn stats(&self) -> DeviceStats;

    /// Notify the device that the output surface has been resized
    fn resize(&mut self, width: u32, height: u32);
}

// ============================================================================
// Plugin system for registering device backends
// ============================================================================

/// Device plugin factory function type
type GraphicsDevicePluginFactory =
    Box<dyn Fn(&Window, Config) -> Result<Arc<Mutex<dyn GraphicsDevice>>> + Send + Sync>;

/// Plugin registry for device backends
pub struct GraphicsDevicePluginRegistry {
    plugins: HashMap<&'static str, GraphicsDevicePluginFactory>,
}

impl GraphicsDevicePluginRegistry {
    fn new() -> Self {
        Self {
            plugins: HashMap::new(),
        }
    }

    /// Register a plugin
    ///
    /// # Arguments
    ///
    /// * `name` - Plugin name (e.g., "headless")
    /// * `factory` - Factory function to create the device
    pub fn register_plugin<F>(&mut self, name: &'static str, factory: F)
    where
        F: Fn(&Window, Config) -> Result<Arc<Mutex<dyn GraphicsDevice>>> + Send + Sync + 'static,
    {
        self.plugins.insert(name, Box::new(factory));
    }

    /// Whether a plugin with this name is registered
    pub fn has_plugin(&self, name: &str) -> bool {
        self.plugins.contains_key(name)
    }

    /// Create a device using a registered plugin
    pub fn create_device(
        &self,
        plugin_name: &str,
        window: &Window,
        config: Config,
    ) -> Result<Arc<Mutex<dyn GraphicsDevice>>> {
        self.plugins
            .get(plugin_name)
            .ok_or_else(|| Error::DeviceUnavailable(format!("Plugin '{}' not found", plugin_name)))?
            (window, config)
    }
}

static DEVICE_REGISTRY: Mutex<Option<GraphicsDevicePluginRegistry>> = Mutex::new(None);

/// Run `f` against the global device plugin registry
///
/// The registry is created on first access.
pub fn with_graphics_device_plugin_registry<R>(
    f: impl FnOnce(&mut GraphicsDevicePluginRegistry) -> R,
) -> Result<R> {
    let mut lock = DEVICE_REGISTRY
        .lock()
        .map_err(|_| Error::BackendError("Device plugin registry lock poisoned".to_string()))?;
    let registry = lock.get_or_insert_with(GraphicsDevicePluginRegistry::new);
    Ok(f(registry))
}

/// Register a device plugin in the global registry
pub fn register_graphics_device_plugin<F>(name: &'static str, factory: F) -> Result<()>
where
    F: Fn(&Window, Config) -> Result<Arc<Mutex<dyn GraphicsDevice>>> + Send + Sync + 'static,
{
    with_graphics_device_plugin_registry(|registry| registry.register_plugin(name, factory))
}

/// Create a device through a plugin of the global registry
pub fn create_graphics_device(
    plugin_name: &str,
    window: &Window,
    config: Config,
) -> Result<Arc<Mutex<dyn GraphicsDevice>>> {
    with_graphics_device_plugin_registry(|registry| registry.create_device(plugin_name, window, config))?
}

#[cfg(test)]
#[path = "graphics_device_tests.rs"]
mod tests;
