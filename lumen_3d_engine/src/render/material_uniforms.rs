/// Per-draw uniform assembly for each material kind.
///
/// Produces the full (name, value) list one render item uploads before its
/// draw call. Names match the shipped shaders.

use glam::{Mat4, Vec3};
use crate::graphics_device::UniformValue;
use crate::resource::{BasicMaterial, Material, PhongMaterial};
use crate::scene::LightSnapshot;

/// Array sizes declared by the phong fragment shader
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;
pub const MAX_AMBIENT_LIGHTS: usize = 4;
pub const MAX_POINT_LIGHTS: usize = 8;

/// Values shared by every draw of a frame
#[derive(Debug, Clone, Copy)]
pub struct FrameUniforms<'a> {
    pub projection_view: Mat4,
    pub camera_position: Vec3,
    pub lights: &'a LightSnapshot,
    /// Seconds since the renderer was created
    pub elapsed: f32,
}

/// Warn about the lights that do not fit the shader arrays
///
/// Called once per frame. Returns how many lights the frame drops.
pub fn report_dropped_lights(lights: &LightSnapshot) -> usize {
    let directional = lights.directional.len().saturating_sub(MAX_DIRECTIONAL_LIGHTS);
    let ambient = lights.ambient.len().saturating_sub(MAX_AMBIENT_LIGHTS);
    let point = lights.point.len().saturating_sub(MAX_POINT_LIGHTS);
    let dropped = directional + ambient + point;
    if dropped > 0 {
        crate::engine_warn!(
            "lumen3d::Lights",
            "{} light(s) over the shader limits dropped ({} directional, {} ambient, {} point)",
            dropped,
            directional,
            ambient,
            point
        );
    }
    dropped
}

/// Uniform list for one drawable
pub fn assemble(material: &Material, world: &Mat4, frame: &FrameUniforms) -> Vec<(String, UniformValue)> {
    match material {
        Material::Phong(phong) => assemble_phong(phong, world, frame),
        Material::Basic(basic) => assemble_basic(basic, world, frame),
    }
}

fn push(list: &mut Vec<(String, UniformValue)>, name: impl Into<String>, value: impl Into<UniformValue>) {
    list.push((name.into(), value.into()));
}

fn assemble_phong(material: &PhongMaterial, world: &Mat4, frame: &FrameUniforms) -> Vec<(String, UniformValue)> {
    let mut list = Vec::with_capacity(32);

    push(&mut list, "u_WorldMatrix", *world);
    push(&mut list, "u_Matrix", frame.projection_view * *world);
    push(&mut list, "u_inversedWorldMatrix", world.inverse().transpose());
    push(&mut list, "u_Time", frame.elapsed);
    push(&mut list, "u_CameraPosition", frame.camera_position);

    let lights = frame.lights;

    let directional = &lights.directional[..lights.directional.len().min(MAX_DIRECTIONAL_LIGHTS)];
    push(&mut list, "u_DirectionalLightsCount", directional.len() as i32);
    for (i, light) in directional.iter().enumerate() {
        push(&mut list, format!("u_DirectionalLights[{}].direction", i), light.direction);
        push(&mut list, format!("u_DirectionalLights[{}].color", i), light.color);
        push(&mut list, format!("u_DirectionalLights[{}].intensity", i), light.intensity);
    }

    let ambient = &lights.ambient[..lights.ambient.len().min(MAX_AMBIENT_LIGHTS)];
    push(&mut list, "u_AmbientLightsCount", ambient.len() as i32);
    for (i, light) in ambient.iter().enumerate() {
        push(&mut list, format!("u_AmbientLights[{}].color", i), light.color);
        push(&mut list, format!("u_AmbientLights[{}].intensity", i), light.intensity);
    }

    let point = &lights.point[..lights.point.len().min(MAX_POINT_LIGHTS)];
    push(&mut list, "u_PointLightsCount", point.len() as i32);
    for (i, light) in point.iter().enumerate() {
        push(&mut list, format!("u_PointLights[{}].position", i), light.position);
        push(&mut list, format!("u_PointLights[{}].color", i), light.color);
        push(&mut list, format!("u_PointLights[{}].intensity", i), light.intensity);
    }

    push(&mut list, "u_PhongMaterial.diffuse", material.diffuse().to_vec4());
    push(&mut list, "u_PhongMaterial.specular", material.specular.to_vec4());
    push(&mut list, "u_PhongMaterial.emissive", material.emissive.to_vec4());
    push(&mut list, "u_PhongMaterial.emissiveIntensity", material.emissive_intensity);
    push(&mut list, "u_PhongMaterial.shininess", material.shininess);
    push(&mut list, "u_PhongMaterial.reflectivity", material.reflectivity);

    list
}

fn assemble_basic(material: &BasicMaterial, world: &Mat4, frame: &FrameUniforms) -> Vec<(String, UniformValue)> {
    let mut list = Vec::with_capacity(4);
    push(&mut list, "u_Matrix", frame.projection_view * *world);
    push(&mut list, "u_WorldMatrix", *world);
    push(&mut list, "u_Time", frame.elapsed);
    push(&mut list, "u_BasicMaterial.color", material.color.to_vec4());
    list
}

#[cfg(test)]
#[path = "material_uniforms_tests.rs"]
mod tests;
