/// Scene node types.
///
/// A Node is one entry of the scene arena: a transform, a visibility flag,
/// a payload (group, mesh or light) and its hierarchy links. Links are
/// `NodeKey`s into the same arena; the child list is the ownership path.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use glam::{Mat3, Mat4, Quat, Vec3};
use slotmap::new_key_type;
use crate::resource::{Geometry, Material};
use super::light::Light;

// ===== KEYS & IDENTITY =====

new_key_type! {
    /// Stable key for a Node within a Scene.
    ///
    /// Keys remain valid even after other nodes are destroyed.
    /// A key becomes invalid only when its own node is destroyed.
    pub struct NodeKey;
}

/// Process-unique node identity, assigned at creation
///
/// Unlike `NodeKey`, ids never repeat across scenes or after a slot is
/// reused. The render queue is keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

impl NodeId {
    pub(crate) fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

// ===== TRANSFORM =====

/// Local position/rotation/scale plus the derived local and world matrices
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Unit quaternion
    pub rotation: Quat,
    pub scale: Vec3,
    local_matrix: Mat4,
    world_matrix: Mat4,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            local_matrix: Mat4::IDENTITY,
            world_matrix: Mat4::IDENTITY,
        }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::new()
        }
    }

    /// Rotate around the local X axis
    pub fn rotate_x(&mut self, radians: f32) -> &mut Self {
        self.rotation *= Quat::from_rotation_x(radians);
        self
    }

    /// Rotate around the local Y axis
    pub fn rotate_y(&mut self, radians: f32) -> &mut Self {
        self.rotation *= Quat::from_rotation_y(radians);
        self
    }

    /// Rotate around the local Z axis
    pub fn rotate_z(&mut self, radians: f32) -> &mut Self {
        self.rotation *= Quat::from_rotation_z(radians);
        self
    }

    /// Orient so that local +Z points from `target` towards the position,
    /// with world up (0, 1, 0)
    ///
    /// A target equal to the position, or a direction parallel to up, yields
    /// a NaN rotation. Callers must avoid those inputs.
    pub fn look_at(&mut self, target: Vec3) {
        let z = (self.position - target).normalize();
        let x = Vec3::Y.cross(z).normalize();
        let y = z.cross(x);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(x, y, z));
    }

    /// Recompute the local matrix as translate * rotate * scale
    pub fn update_matrix(&mut self) {
        self.local_matrix =
            Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position);
    }

    /// Recompute the local matrix, then the world matrix from the parent's
    pub(crate) fn update_world(&mut self, parent_world: Option<&Mat4>) {
        self.update_matrix();
        self.world_matrix = match parent_world {
            Some(parent) => *parent * self.local_matrix,
            None => self.local_matrix,
        };
    }

    pub fn local_matrix(&self) -> &Mat4 {
        &self.local_matrix
    }

    pub fn world_matrix(&self) -> &Mat4 {
        &self.world_matrix
    }

    /// Translation part of the world matrix
    pub fn world_position(&self) -> Vec3 {
        self.world_matrix.w_axis.truncate()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

// ===== PAYLOADS =====

/// Drawable payload: shared geometry plus a material
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: Arc<Geometry>,
    pub material: Material,
}

impl Mesh {
    pub fn new(geometry: Arc<Geometry>, material: impl Into<Material>) -> Self {
        Self {
            geometry,
            material: material.into(),
        }
    }
}

/// What a node carries besides its transform
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// Pure transform (scene root, pivots)
    Group,
    Mesh(Mesh),
    Light(Light),
}

// ===== NODE =====

/// One entry of the scene arena
///
/// Not `Clone`: a copy would share the same identity.
#[derive(Debug)]
pub struct Node {
    id: NodeId,
    name: Option<String>,
    pub transform: Transform,
    pub visible: bool,
    pub kind: NodeKind,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: NodeId::next(),
            name: None,
            transform: Transform::new(),
            visible: true,
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    pub fn mesh(geometry: Arc<Geometry>, material: impl Into<Material>) -> Self {
        Self::new(NodeKind::Mesh(Mesh::new(geometry, material)))
    }

    pub fn light(light: Light) -> Self {
        Self::new(NodeKind::Light(light))
    }

    /// Builder-style debug name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder-style initial position
    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match &mut self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }

    pub fn as_light_mut(&mut self) -> Option<&mut Light> {
        match &mut self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "node_tests.rs"]
mod tests;
