/// Render module - uniforms, program cache, render queue and the renderer

pub mod uniform;
pub mod program_cache;
pub mod render_queue;
pub mod material_uniforms;
pub mod render_item;
pub mod render_context;
pub mod renderer;

pub use uniform::{Uniform, UniformSet};
pub use program_cache::{ProgramCache, ProgramKey};
pub use render_queue::{Bucket, RenderQueue};
pub use material_uniforms::{
    report_dropped_lights, FrameUniforms, MAX_AMBIENT_LIGHTS, MAX_DIRECTIONAL_LIGHTS, MAX_POINT_LIGHTS,
};
pub use render_item::{DrawCommand, RenderItem};
pub use render_context::{DrawStats, RenderContext};
pub use renderer::{RenderStats, Renderer, RendererConfig};
