/// Program trait, program descriptor and program reflection

use crate::graphics_device::UniformType;

/// Shader stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment/Pixel shader
    Fragment,
}

/// Descriptor for creating a program from a vertex/fragment source pair
///
/// Sources are consumed verbatim by the backend.
#[derive(Debug, Clone, Copy)]
pub struct ProgramDesc<'a> {
    /// Vertex stage source text
    pub vertex_source: &'a str,
    /// Fragment stage source text
    pub fragment_source: &'a str,
    /// Debug label
    pub label: &'a str,
}

/// Resolved location of a uniform inside a linked program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UniformLocation(pub u32);

/// Resolved location of a vertex attribute inside a linked program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeLocation(pub u32);

/// One active uniform of a linked program
///
/// Struct members and array elements are flattened into their full GLSL
/// names (`u_PointLights[1].position`).
#[derive(Debug, Clone, PartialEq)]
pub struct UniformInfo {
    pub name: String,
    pub location: UniformLocation,
    pub uniform_type: UniformType,
}

/// One active vertex attribute of a linked program
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeInfo {
    pub name: String,
    pub location: AttributeLocation,
    /// Float components per vertex (1 to 4)
    pub components: u32,
}

/// What a linked program exposes to the CPU side
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgramReflection {
    pub uniforms: Vec<UniformInfo>,
    pub attributes: Vec<AttributeInfo>,
}

impl ProgramReflection {
    /// Reflection with no uniforms and no attributes
    pub fn empty() -> Self {
        Self::default()
    }

    /// Find an active uniform by its full name
    pub fn uniform(&self, name: &str) -> Option<&UniformInfo> {
        self.uniforms.iter().find(|u| u.name == name)
    }

    /// Find an active attribute by name
    pub fn attribute(&self, name: &str) -> Option<&AttributeInfo> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Program resource trait
///
/// A compiled, linked and validated vertex/fragment pair. Implemented by
/// backend-specific program types. The program is released when the last
/// reference is dropped.
pub trait Program: Send + Sync {
    /// Active uniforms and attributes
    fn reflection(&self) -> &ProgramReflection;

    /// Debug label given at creation
    fn label(&self) -> &str;

    /// Location of a uniform, or `None` when the program does not use it
    fn uniform_location(&self, name: &str) -> Option<UniformLocation> {
        self.reflection().uniform(name).map(|u| u.location)
    }

    /// Location of a vertex attribute, or `None` when the program does not use it
    fn attribute_location(&self, name: &str) -> Option<AttributeLocation> {
        self.reflection().attribute(name).map(|a| a.location)
    }
}

#[cfg(test)]
#[path = "program_tests.rs"]
mod tests;
