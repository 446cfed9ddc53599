/// Graphics device module - the GPU boundary consumed by the renderer

// Module declarations
pub mod graphics_device;
pub mod buffer;
pub mod program;
pub mod vertex_array;
pub mod pipeline_state;
pub mod uniform_value;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Re-export from other modules
pub use buffer::*;
pub use program::*;
pub use vertex_array::*;
pub use pipeline_state::*;
pub use uniform_value::*;

// Mock graphics device for tests (no GPU required)
#[cfg(test)]
pub mod mock_graphics_device;
