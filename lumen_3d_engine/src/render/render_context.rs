/// RenderContext: per-(scene, camera) rendering session.
///
/// Holds the program cache and the ordered render queue. The renderer feeds
/// it the visible drawables of each frame through `prepare`, drops the ones
/// it did not see with `retain_seen`, then calls `draw`.

use std::sync::Arc;
use glam::Mat4;
use rustc_hash::FxHashSet;
use crate::camera::PerspectiveCamera;
use crate::error::Result;
use crate::graphics_device::{GraphicsDevice, PipelineState, Program};
use crate::scene::{LightSnapshot, Mesh, NodeId};
use super::material_uniforms::{report_dropped_lights, FrameUniforms};
use super::program_cache::{ProgramCache, ProgramKey};
use super::render_item::RenderItem;
use super::render_queue::{Bucket, RenderQueue};

/// What one `draw` submitted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub draw_calls: u32,
    pub triangles: u32,
}

pub struct RenderContext {
    scene_id: NodeId,
    camera_id: NodeId,
    programs: ProgramCache,
    queue: RenderQueue<RenderItem>,
    blend_transparent: bool,
}

impl RenderContext {
    /// Create an empty context bound to a scene and a camera identity
    pub fn new(scene_id: NodeId, camera_id: NodeId, blend_transparent: bool) -> Self {
        crate::engine_info!(
            "lumen3d::RenderContext",
            "Render context created (scene {}, camera {})",
            scene_id.value(),
            camera_id.value()
        );
        Self {
            scene_id,
            camera_id,
            programs: ProgramCache::new(),
            queue: RenderQueue::new(),
            blend_transparent,
        }
    }

    /// Whether this context was created for this scene and camera
    pub fn is_for(&self, scene_id: NodeId, camera_id: NodeId) -> bool {
        self.scene_id == scene_id && self.camera_id == camera_id
    }

    // ===== QUEUE =====

    /// Create or reuse the render item of a drawable and refresh its state
    ///
    /// The item is reused when it was built from the same geometry and the
    /// same shader pair. The bucket follows the material alpha on every call;
    /// a bucket change moves the item to the end of its new bucket.
    pub fn prepare(
        &mut self,
        device: &mut dyn GraphicsDevice,
        id: NodeId,
        world: Mat4,
        mesh: &Mesh,
    ) -> Result<()> {
        let bucket = Bucket::for_transparency(mesh.material.is_transparent());
        let source = mesh.material.shader_source();
        let key = ProgramKey::from_source(&source);

        let reusable = self
            .queue
            .get(id)
            .is_some_and(|item| item.matches(&mesh.geometry, key));

        if reusable {
            if self.queue.bucket_of(id) == Some(bucket) {
                if let Some(item) = self.queue.get_mut(id) {
                    item.update(world, &mesh.material);
                }
            } else if let Some(mut item) = self.queue.remove(id) {
                crate::engine_debug!(
                    "lumen3d::RenderContext",
                    "Node {} moved to the {:?} bucket",
                    id.value(),
                    bucket
                );
                item.update(world, &mesh.material);
                self.queue.insert(id, item, bucket);
            }
            return Ok(());
        }

        let (key, program) = self
            .programs
            .get_or_compile(device, &source, mesh.material.kind_name())?;
        let mut item = RenderItem::build(device, key, program, &mesh.geometry, &mesh.material)?;
        item.update(world, &mesh.material);
        self.add(id, item, bucket == Bucket::Transparent);
        Ok(())
    }

    /// Insert an item under `id`, superseding any previous item
    ///
    /// Returns the superseded item; dropping it releases its buffers.
    pub fn add(&mut self, id: NodeId, item: RenderItem, transparent: bool) -> Option<RenderItem> {
        let superseded = self.queue.insert(id, item, Bucket::for_transparency(transparent));
        if superseded.is_some() {
            crate::engine_debug!("lumen3d::RenderContext", "Render item of node {} superseded", id.value());
        }
        superseded
    }

    /// Drop the items whose identity is not in `seen`
    ///
    /// Returns how many items were released.
    pub fn retain_seen(&mut self, seen: &FxHashSet<NodeId>) -> usize {
        let stale = self.queue.retain(|id| seen.contains(&id));
        if !stale.is_empty() {
            crate::engine_debug!("lumen3d::RenderContext", "Released {} stale render item(s)", stale.len());
        }
        stale.len()
    }

    // ===== DRAW =====

    /// Draw every opaque item then every transparent item, in insertion order
    pub fn draw(
        &mut self,
        device: &mut dyn GraphicsDevice,
        camera: &PerspectiveCamera,
        lights: &LightSnapshot,
        elapsed: f32,
    ) -> Result<DrawStats> {
        report_dropped_lights(lights);
        let frame = FrameUniforms {
            projection_view: camera.projection_view_matrix(),
            camera_position: camera.world_position(),
            lights,
            elapsed,
        };
        let opaque = PipelineState::opaque();
        let transparent = if self.blend_transparent {
            PipelineState::transparent()
        } else {
            PipelineState::opaque()
        };

        let mut stats = DrawStats::default();
        for (_, bucket, item) in self.queue.iter_mut() {
            let pipeline = match bucket {
                Bucket::Opaque => &opaque,
                Bucket::Transparent => &transparent,
            };
            stats.triangles += item.draw(device, &frame, pipeline)?;
            stats.draw_calls += 1;
        }
        Ok(stats)
    }

    // ===== TEARDOWN =====

    /// Drop every render item and cached program
    pub fn release(&mut self) {
        if self.queue.is_empty() && self.programs.is_empty() {
            return;
        }
        let items = self.queue.clear();
        crate::engine_info!(
            "lumen3d::RenderContext",
            "Render context released ({} item(s), {} program(s))",
            items.len(),
            self.programs.len()
        );
        drop(items);
        self.programs.clear();
    }

    // ===== ACCESSORS =====

    pub fn queue(&self) -> &RenderQueue<RenderItem> {
        &self.queue
    }

    pub fn programs(&self) -> &ProgramCache {
        &self.programs
    }

    pub fn item(&self, id: NodeId) -> Option<&RenderItem> {
        self.queue.get(id)
    }

    /// Cached program for a shader pair, if compiled
    pub fn program(&self, key: ProgramKey) -> Option<&Arc<dyn Program>> {
        self.programs.get(key)
    }
}

impl Drop for RenderContext {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
#[path = "render_context_tests.rs"]
mod tests;
