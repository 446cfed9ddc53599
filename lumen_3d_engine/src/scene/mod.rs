//! Scene module
//!
//! Provides the node arena with its transform hierarchy, drawable meshes,
//! lights and the per-frame light snapshot.

mod node;
mod light;
mod scene;

pub use node::{Node, NodeId, NodeKey, NodeKind, Mesh, Transform};
pub use light::{
    Light, LightKind, LightSnapshot,
    AmbientLightData, DirectionalLightData, PointLightData,
};
pub use scene::Scene;
