/// Resource-level material types.
///
/// A material is a pure data description of a surface. It selects a shading
/// model (and therefore a shader pair) and carries that model's parameters.
/// No GPU resources are created at this level; the render context compiles
/// and caches one program per distinct shader pair.
///
/// Every material has a base color. Its alpha decides queue placement: fully
/// opaque materials go to the opaque bucket, anything else to the
/// transparent bucket.

use crate::resource::Color;

// ===== SHADER SOURCES =====

const PHONG_VERTEX: &str = include_str!("../../shaders/phong.vert.glsl");
const PHONG_FRAGMENT: &str = include_str!("../../shaders/phong.frag.glsl");
const BASIC_VERTEX: &str = include_str!("../../shaders/basic.vert.glsl");
const BASIC_FRAGMENT: &str = include_str!("../../shaders/basic.frag.glsl");

/// Vertex/fragment source pair consumed verbatim by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShaderSource {
    pub vertex: &'static str,
    pub fragment: &'static str,
}

// ===== PHONG =====

/// Phong shading parameters
#[derive(Debug, Clone, PartialEq)]
pub struct PhongMaterial {
    /// Base color, used as the diffuse color
    pub color: Color,
    pub specular: Color,
    pub shininess: f32,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub reflectivity: f32,
    pub refraction_ratio: f32,
    /// Carried as data; draws are always filled triangle lists
    pub wireframe: bool,
    pub wireframe_width: f32,
}

impl PhongMaterial {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }

    /// Diffuse color (the base color)
    pub fn diffuse(&self) -> Color {
        self.color
    }
}

impl Default for PhongMaterial {
    fn default() -> Self {
        Self {
            color: Color::default(),
            specular: Color::rgb(20, 20, 20),
            shininess: 30.0,
            emissive: Color::rgb(0, 0, 0),
            emissive_intensity: 1.0,
            reflectivity: 1.0,
            refraction_ratio: 0.98,
            wireframe: false,
            wireframe_width: 1.0,
        }
    }
}

// ===== BASIC =====

/// Unlit flat color
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BasicMaterial {
    pub color: Color,
}

impl BasicMaterial {
    pub fn new(color: Color) -> Self {
        Self { color }
    }
}

// ===== MATERIAL =====

/// Closed set of shading models
#[derive(Debug, Clone, PartialEq)]
pub enum Material {
    Phong(PhongMaterial),
    Basic(BasicMaterial),
}

impl Material {
    /// Base color of the material
    pub fn color(&self) -> Color {
        match self {
            Material::Phong(phong) => phong.color,
            Material::Basic(basic) => basic.color,
        }
    }

    /// Mutable access to the base color
    pub fn color_mut(&mut self) -> &mut Color {
        match self {
            Material::Phong(phong) => &mut phong.color,
            Material::Basic(basic) => &mut basic.color,
        }
    }

    /// Whether the material belongs in the transparent bucket
    pub fn is_transparent(&self) -> bool {
        !self.color().is_opaque()
    }

    /// Shader pair implementing this shading model
    pub fn shader_source(&self) -> ShaderSource {
        match self {
            Material::Phong(_) => ShaderSource {
                vertex: PHONG_VERTEX,
                fragment: PHONG_FRAGMENT,
            },
            Material::Basic(_) => ShaderSource {
                vertex: BASIC_VERTEX,
                fragment: BASIC_FRAGMENT,
            },
        }
    }

    /// Short name of the shading model, used as a program label
    pub fn kind_name(&self) -> &'static str {
        match self {
            Material::Phong(_) => "phong",
            Material::Basic(_) => "basic",
        }
    }
}

impl From<PhongMaterial> for Material {
    fn from(material: PhongMaterial) -> Self {
        Material::Phong(material)
    }
}

impl From<BasicMaterial> for Material {
    fn from(material: BasicMaterial) -> Self {
        Material::Basic(material)
    }
}

#[cfg(test)]
#[path = "material_tests.rs"]
mod tests;
