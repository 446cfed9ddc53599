/// PerspectiveCamera: a standalone transform plus projection parameters.
///
/// The camera is not part of the scene arena. It owns its transform and
/// refreshes its own world matrix; the renderer does so once per frame
/// before reading view or projection.
///
/// Projection follows the OpenGL clip-space convention (depth in -1..1),
/// which is what the shipped GLSL shaders expect.

use glam::{Mat4, Vec3};
use crate::scene::{NodeId, Transform};

/// Perspective camera
///
/// Not `Clone`: a copy would share the same identity.
#[derive(Debug)]
pub struct PerspectiveCamera {
    id: NodeId,
    pub transform: Transform,
    /// Vertical field of view, in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    /// Create a camera with default fov (35), aspect (1), near (0.1), far (1000)
    pub fn new() -> Self {
        Self {
            id: NodeId::next(),
            transform: Transform::new(),
            fov: 35.0,
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Create a camera with explicit projection parameters
    pub fn with_projection(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
            ..Self::new()
        }
    }

    /// Process-unique identity of this camera
    pub fn id(&self) -> NodeId {
        self.id
    }

    // ===== MATRICES =====

    /// Projection matrix, recomputed from the current parameters
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    /// Inverse of the world matrix
    pub fn view_matrix(&self) -> Mat4 {
        self.transform.world_matrix().inverse()
    }

    /// projection * view
    pub fn projection_view_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space position of the camera
    pub fn world_position(&self) -> Vec3 {
        self.transform.world_position()
    }

    // ===== UPDATES =====

    /// Refresh local and world matrices (the camera has no parent)
    pub fn update_world_matrix(&mut self) {
        self.transform.update_world(None);
    }

    /// Orient towards `target` then refresh the world matrix
    pub fn look_at(&mut self, target: Vec3) {
        self.transform.look_at(target);
        self.update_world_matrix();
    }

    /// Match the aspect ratio to a surface size. A zero height is ignored.
    pub fn set_aspect_from_size(&mut self, width: u32, height: u32) {
        if height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "camera_tests.rs"]
mod tests;
