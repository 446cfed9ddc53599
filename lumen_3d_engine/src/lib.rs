/*!
# Lumen 3D Engine

Core types for the Lumen 3D scene engine.

This crate provides a retained-mode scene graph and a forward renderer that
draws it through an abstract graphics device. Device implementations live in
separate crates (e.g. the headless device) and plug in through the
`GraphicsDevice` trait.

## Architecture

- **Scene**: Arena of nodes (groups, meshes, lights) with world-matrix propagation
- **PerspectiveCamera**: View and projection matrices
- **Resource**: Colors, geometry and materials
- **Renderer**: Per-frame reconciliation of the scene into render items
- **GraphicsDevice**: GPU boundary (buffers, programs, vertex arrays, draws)
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod graphics_device;
pub mod render;
pub mod resource;
pub mod scene;
pub mod camera;

// Main lumen3d namespace module
pub mod lumen3d {
    // Error types
    pub use crate::error::{Error, Result};

    // Engine singleton
    pub use crate::engine::Engine;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Device boundary
    pub mod graphics_device {
        pub use crate::graphics_device::*;
    }

    // Renderer, render context and uniforms
    pub mod render {
        pub use crate::render::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }

    // Scene sub-module
    pub mod scene {
        pub use crate::scene::*;
    }

    // Camera sub-module
    pub mod camera {
        pub use crate::camera::*;
    }
}

// Re-export math library at crate root
pub use glam;
