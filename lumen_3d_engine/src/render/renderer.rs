/// Renderer: per-frame driver on top of a shared graphics device.
///
/// One `render` call clears the frame, refreshes world matrices of the scene
/// and the camera, walks the visible part of the scene to update the render
/// context, then asks the context to draw. The context is created lazily and
/// recreated when the scene or camera identity changes.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use glam::Mat4;
use rustc_hash::FxHashSet;
use crate::camera::PerspectiveCamera;
use crate::error::Result;
use crate::graphics_device::{ClearFlags, GraphicsDevice, Viewport};
use crate::resource::Color;
use crate::scene::{LightSnapshot, Mesh, NodeId, Scene};
use super::render_context::RenderContext;

// ===== CONFIG =====

/// Renderer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Clear color
    pub background_color: Color,
    /// Initial viewport width
    pub width: u32,
    /// Initial viewport height
    pub height: u32,
    /// Passed to the surface collaborator; the renderer itself ignores it
    pub antialias: bool,
    /// Buffers cleared at the start of each frame
    pub clear_flags: ClearFlags,
    /// Draw the transparent bucket with alpha blending and depth writes off
    pub blend_transparent: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            background_color: Color::rgb(191, 204, 217),
            width: 480,
            height: 320,
            antialias: true,
            clear_flags: ClearFlags::default(),
            blend_transparent: true,
        }
    }
}

/// Statistics of the last rendered frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub draw_calls: u32,
    pub triangles: u32,
    pub opaque_items: usize,
    pub transparent_items: usize,
    pub programs: usize,
}

// ===== RENDERER =====

pub struct Renderer {
    device: Arc<Mutex<dyn GraphicsDevice>>,
    config: RendererConfig,
    context: Option<RenderContext>,
    started: Instant,
    stats: RenderStats,
}

fn lock(device: &Arc<Mutex<dyn GraphicsDevice>>) -> Result<MutexGuard<'_, dyn GraphicsDevice + 'static>> {
    device
        .lock()
        .map_err(|_| crate::engine_err!("lumen3d::Renderer", "Graphics device lock poisoned"))
}

impl Renderer {
    /// Create a renderer and set the initial viewport
    pub fn new(device: Arc<Mutex<dyn GraphicsDevice>>, config: RendererConfig) -> Result<Self> {
        lock(&device)?.set_viewport(Viewport::from_size(config.width, config.height))?;
        crate::engine_info!(
            "lumen3d::Renderer",
            "Renderer created ({}x{})",
            config.width,
            config.height
        );
        Ok(Self {
            device,
            config,
            context: None,
            started: Instant::now(),
            stats: RenderStats::default(),
        })
    }

    /// Render one frame of `scene` seen from `camera`
    pub fn render(&mut self, scene: &mut Scene, camera: &mut PerspectiveCamera) -> Result<()> {
        let device = Arc::clone(&self.device);
        let mut device = lock(&device)?;

        device.clear(self.config.background_color.to_array(true), self.config.clear_flags)?;

        let context_matches = self
            .context
            .as_ref()
            .is_some_and(|context| context.is_for(scene.id(), camera.id()));
        if !context_matches {
            // drop the previous session before opening a new one
            self.context = None;
            self.context = Some(RenderContext::new(
                scene.id(),
                camera.id(),
                self.config.blend_transparent,
            ));
        }

        scene.update_world_matrices();
        camera.update_world_matrix();

        let mut drawables: Vec<(NodeId, Mat4, &Mesh)> = Vec::new();
        scene.traverse_visible(scene.root(), |_, node| {
            if let Some(mesh) = node.as_mesh() {
                drawables.push((node.id(), *node.transform.world_matrix(), mesh));
            }
        });

        let Some(context) = self.context.as_mut() else {
            return Ok(());
        };

        let mut seen = FxHashSet::default();
        for (id, world, mesh) in drawables {
            context.prepare(&mut *device, id, world, mesh)?;
            seen.insert(id);
        }
        context.retain_seen(&seen);

        let lights = LightSnapshot::capture(scene);
        let elapsed = self.started.elapsed().as_secs_f32();
        let drawn = context.draw(&mut *device, camera, &lights, elapsed)?;

        self.stats = RenderStats {
            draw_calls: drawn.draw_calls,
            triangles: drawn.triangles,
            opaque_items: context.queue().opaque_len(),
            transparent_items: context.queue().transparent_len(),
            programs: context.programs().len(),
        };
        Ok(())
    }

    /// Clear the frame with `color` and the configured flags
    pub fn clear(&mut self, color: Color) -> Result<()> {
        lock(&self.device)?.clear(color.to_array(true), self.config.clear_flags)
    }

    /// Resize the device surface and viewport
    pub fn resize(&mut self, width: u32, height: u32) -> Result<()> {
        self.config.width = width;
        self.config.height = height;
        let mut device = lock(&self.device)?;
        device.resize(width, height);
        device.set_viewport(Viewport::from_size(width, height))
    }

    /// Drop the render context and every GPU resource it holds
    pub fn release(&mut self) {
        self.context = None;
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn context(&self) -> Option<&RenderContext> {
        self.context.as_ref()
    }

    pub fn device(&self) -> &Arc<Mutex<dyn GraphicsDevice>> {
        &self.device
    }
}

#[cfg(test)]
#[path = "renderer_tests.rs"]
mod tests;
