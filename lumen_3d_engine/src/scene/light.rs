/// Light payloads and the per-frame light snapshot

use glam::{Vec3, Vec4};
use crate::resource::Color;
use super::{NodeKind, NodeKey, Scene};

/// Kind-specific light data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Uniform light from every direction
    Ambient,
    /// Parallel rays along `direction`
    Directional { direction: Vec3 },
    /// Light emitted from the node's world position
    Point,
}

/// Light payload of a node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub color: Color,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    pub fn new(kind: LightKind) -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            kind,
        }
    }

    pub fn ambient() -> Self {
        Self::new(LightKind::Ambient)
    }

    /// Directional light pointing down -Z
    pub fn directional() -> Self {
        Self::new(LightKind::Directional {
            direction: Vec3::new(0.0, 0.0, -1.0),
        })
    }

    pub fn point() -> Self {
        Self::new(LightKind::Point)
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    /// Replace the direction (no effect on non-directional lights)
    pub fn with_direction(mut self, direction: Vec3) -> Self {
        if let LightKind::Directional { direction: d } = &mut self.kind {
            *d = direction;
        }
        self
    }
}

// ===== SNAPSHOT =====

/// Resolved directional light, ready for upload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLightData {
    pub direction: Vec3,
    /// Normalized color
    pub color: Vec4,
    pub intensity: f32,
}

/// Resolved ambient light, ready for upload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLightData {
    pub color: Vec4,
    pub intensity: f32,
}

/// Resolved point light, ready for upload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLightData {
    /// World-space position
    pub position: Vec3,
    pub color: Vec4,
    pub intensity: f32,
}

/// The lights of one frame, split per kind
///
/// Each list is in depth-first traversal order; list index i is the shader
/// array slot i. Captured once per frame from visible lights, after world
/// matrices have been refreshed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightSnapshot {
    pub directional: Vec<DirectionalLightData>,
    pub ambient: Vec<AmbientLightData>,
    pub point: Vec<PointLightData>,
}

impl LightSnapshot {
    /// Capture the visible lights under the scene root
    pub fn capture(scene: &Scene) -> Self {
        let mut snapshot = Self::default();
        scene.traverse_visible(scene.root(), |_key: NodeKey, node| {
            let NodeKind::Light(light) = &node.kind else {
                return;
            };
            let color = light.color.to_vec4();
            match light.kind {
                LightKind::Directional { direction } => {
                    snapshot.directional.push(DirectionalLightData {
                        direction,
                        color,
                        intensity: light.intensity,
                    });
                }
                LightKind::Ambient => {
                    snapshot.ambient.push(AmbientLightData {
                        color,
                        intensity: light.intensity,
                    });
                }
                LightKind::Point => {
                    snapshot.point.push(PointLightData {
                        position: node.transform.world_position(),
                        color,
                        intensity: light.intensity,
                    });
                }
            }
        });
        snapshot
    }

    /// Total number of lights
    pub fn len(&self) -> usize {
        self.directional.len() + self.ambient.len() + self.point.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[path = "light_tests.rs"]
mod tests;
