/*!
# Lumen 3D Engine - Headless Device

CPU-only implementation of the Lumen 3D `GraphicsDevice` trait.

Nothing is rasterized: the device checks every call, reflects programs from
their GLSL text and records what it receives. It runs the renderer in tests
and on machines without a GPU.

The backend is registered as a plugin and can be selected at runtime.
*/

mod glsl_reflection;
mod headless_buffer;
mod headless_program;
mod headless_recorder;
mod headless_graphics_device;

pub use headless_buffer::HeadlessBuffer;
pub use headless_program::{HeadlessProgram, HeadlessVertexArray};
pub use headless_recorder::{Command, HeadlessInspector};
pub use headless_graphics_device::HeadlessGraphicsDevice;

use std::sync::{Arc, Mutex};
use lumen_3d_engine::lumen3d::Result;
use lumen_3d_engine::lumen3d::graphics_device::{register_graphics_device_plugin, GraphicsDevice};

/// Name under which `register` publishes the device
pub const PLUGIN_NAME: &str = "headless";

/// Register the headless backend with the plugin system
///
/// The created device starts sized to the window's inner size.
///
/// # Example
///
/// ```no_run
/// use lumen_3d_engine::lumen3d::graphics_device::{create_graphics_device, Config};
/// # fn demo(window: &winit::window::Window) -> lumen_3d_engine::lumen3d::Result<()> {
/// lumen_3d_engine_device_headless::register()?;
/// let device = create_graphics_device("headless", window, Config::default())?;
/// # Ok(())
/// # }
/// ```
pub fn register() -> Result<()> {
    register_graphics_device_plugin(PLUGIN_NAME, |window, config| {
        let mut device = HeadlessGraphicsDevice::with_config(config);
        let size = window.inner_size();
        device.resize(size.width, size.height);
        let device: Arc<Mutex<dyn GraphicsDevice>> = Arc::new(Mutex::new(device));
        Ok(device)
    })
}
