/// GLSL interface reflection for the headless device
///
/// Each stage is parsed by the naga GLSL frontend. The resulting module is
/// walked for the CPU-visible interface: uniform block members flattened
/// into the names a GL driver reports (`u_PointLights[2].position`), the
/// located inputs and outputs of `main`, and the `gl_Position` write.

use rustc_hash::FxHashMap;
use naga::front::glsl::{Frontend, Options};
use naga::{AddressSpace, ArraySize, Binding, BuiltIn, Handle, Module, ScalarKind, Type, TypeInner, VectorSize};
use lumen_3d_engine::lumen3d::{Error, Result};
use lumen_3d_engine::lumen3d::graphics_device::{
    ShaderStage, UniformType, UniformInfo, UniformLocation, AttributeInfo,
    AttributeLocation, ProgramReflection,
};

// ============================================================================
// Stage interface
// ============================================================================

/// A located input or output of the entry point
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Variable {
    pub name: String,
    pub location: u32,
    /// Components of a scalar or vector type, `None` for anything else
    pub components: Option<u32>,
}

/// Everything one stage exposes to the outside
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct StageInterface {
    /// Flattened uniforms in declaration order
    pub uniforms: Vec<(String, UniformType)>,
    pub inputs: Vec<Variable>,
    pub outputs: Vec<Variable>,
    /// Whether `main` writes `gl_Position`
    pub writes_position: bool,
}

// ============================================================================
// Type mapping
// ============================================================================

fn vector_width(size: VectorSize) -> u32 {
    match size {
        VectorSize::Bi => 2,
        VectorSize::Tri => 3,
        VectorSize::Quad => 4,
    }
}

/// GLSL keyword of a leaf type the device can upload
fn glsl_keyword(inner: &TypeInner) -> Option<&'static str> {
    match *inner {
        TypeInner::Scalar(scalar) => match scalar.kind {
            ScalarKind::Float => Some("float"),
            ScalarKind::Sint | ScalarKind::Bool => Some("int"),
            _ => None,
        },
        TypeInner::Vector { size, scalar } => match (scalar.kind, size) {
            (ScalarKind::Float, VectorSize::Bi) => Some("vec2"),
            (ScalarKind::Float, VectorSize::Tri) => Some("vec3"),
            (ScalarKind::Float, VectorSize::Quad) => Some("vec4"),
            (ScalarKind::Sint, VectorSize::Bi) => Some("ivec2"),
            (ScalarKind::Sint, VectorSize::Tri) => Some("ivec3"),
            (ScalarKind::Sint, VectorSize::Quad) => Some("ivec4"),
            _ => None,
        },
        TypeInner::Matrix { columns: VectorSize::Tri, rows: VectorSize::Tri, .. } => Some("mat3"),
        TypeInner::Matrix { columns: VectorSize::Quad, rows: VectorSize::Quad, .. } => Some("mat4"),
        _ => None,
    }
}

/// Components of an attribute or varying type
fn components(inner: &TypeInner) -> Option<u32> {
    match *inner {
        TypeInner::Scalar(_) => Some(1),
        TypeInner::Vector { size, .. } => Some(vector_width(size)),
        _ => None,
    }
}

// ============================================================================
// Module walk
// ============================================================================

struct Reflector<'a> {
    stage: ShaderStage,
    module: &'a Module,
}

impl Reflector<'_> {
    fn error(&self, message: impl Into<String>) -> Error {
        Error::ShaderCompilationFailed {
            stage: self.stage,
            log: message.into(),
        }
    }

    fn inner(&self, ty: Handle<Type>) -> &TypeInner {
        &self.module.types[ty].inner
    }

    /// Expand one uniform into the names a driver would report
    fn flatten(&self, name: String, ty: Handle<Type>, out: &mut Vec<(String, UniformType)>) -> Result<()> {
        match self.inner(ty) {
            TypeInner::Struct { members, .. } => {
                for member in members {
                    let member_name = member.name.as_deref().unwrap_or_default();
                    self.flatten(format!("{}.{}", name, member_name), member.ty, out)?;
                }
                Ok(())
            }
            TypeInner::Array { base, size, .. } => {
                let count = match size {
                    ArraySize::Constant(count) => count.get(),
                    _ => return Err(self.error(format!("uniform '{}' has no constant size", name))),
                };
                let element = glsl_keyword(self.inner(*base)).and_then(UniformType::from_glsl);
                match element.and_then(|element| element.array_of()) {
                    Some(array_type) => out.push((name, array_type)),
                    None => {
                        for i in 0..count {
                            self.flatten(format!("{}[{}]", name, i), *base, out)?;
                        }
                    }
                }
                Ok(())
            }
            // texture units are not part of the device boundary
            TypeInner::Image { .. } | TypeInner::Sampler { .. } => Ok(()),
            inner => {
                let uniform_type = glsl_keyword(inner)
                    .and_then(UniformType::from_glsl)
                    .ok_or_else(|| self.error(format!("uniform '{}' has an unsupported type", name)))?;
                out.push((name, uniform_type));
                Ok(())
            }
        }
    }

    fn uniforms(&self) -> Result<Vec<(String, UniformType)>> {
        let mut uniforms = Vec::new();
        for (_, global) in self.module.global_variables.iter() {
            if global.space != AddressSpace::Uniform {
                continue;
            }
            let block = &self.module.types[global.ty];
            let unnamed = global.name.is_none() || global.name == block.name;
            match (&block.inner, unnamed) {
                // members of an unnamed block are global names
                (TypeInner::Struct { members, .. }, true) => {
                    for member in members {
                        let member_name = member.name.clone().unwrap_or_default();
                        self.flatten(member_name, member.ty, &mut uniforms)?;
                    }
                }
                _ => {
                    let name = global.name.clone().unwrap_or_default();
                    self.flatten(name, global.ty, &mut uniforms)?;
                }
            }
        }
        Ok(uniforms)
    }

    fn variable(&self, name: Option<&String>, ty: Handle<Type>, binding: Option<&Binding>) -> Option<Variable> {
        match binding {
            Some(Binding::Location { location, .. }) => Some(Variable {
                name: name.cloned().unwrap_or_default(),
                location: *location,
                components: components(self.inner(ty)),
            }),
            _ => None,
        }
    }

    fn run(self) -> Result<StageInterface> {
        let entry = self
            .module
            .entry_points
            .iter()
            .find(|entry| entry.name == "main")
            .ok_or_else(|| self.error("no 'main' entry point"))?;

        let mut interface = StageInterface {
            uniforms: self.uniforms()?,
            ..StageInterface::default()
        };

        for argument in &entry.function.arguments {
            if let Some(variable) = self.variable(argument.name.as_ref(), argument.ty, argument.binding.as_ref()) {
                interface.inputs.push(variable);
            }
        }

        if let Some(result) = &entry.function.result {
            let mut outputs = Vec::new();
            match (self.inner(result.ty), &result.binding) {
                (TypeInner::Struct { members, .. }, None) => {
                    for member in members {
                        outputs.push((member.name.as_ref(), member.ty, member.binding.as_ref()));
                    }
                }
                (_, binding) => outputs.push((None, result.ty, binding.as_ref())),
            }
            for (name, ty, binding) in outputs {
                if matches!(binding, Some(Binding::BuiltIn(BuiltIn::Position { .. }))) {
                    interface.writes_position = true;
                }
                if let Some(variable) = self.variable(name, ty, binding) {
                    interface.outputs.push(variable);
                }
            }
        }

        Ok(interface)
    }
}

/// Parse one stage and reflect its interface
///
/// # Errors
///
/// `ShaderCompilationFailed` when the text is empty, the frontend rejects
/// it, it has no `main`, or a uniform has a type the device cannot upload.
pub(crate) fn parse_stage(stage: ShaderStage, source: &str) -> Result<StageInterface> {
    if source.trim().is_empty() {
        return Err(Error::ShaderCompilationFailed {
            stage,
            log: "empty shader source".to_string(),
        });
    }

    let naga_stage = match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    };
    let module = Frontend::default()
        .parse(&Options::from(naga_stage), source)
        .map_err(|errors| Error::ShaderCompilationFailed {
            stage,
            log: errors.to_string(),
        })?;

    Reflector { stage, module: &module }.run()
}

// ============================================================================
// Linker
// ============================================================================

/// Merge both stage interfaces into a program reflection
///
/// Uniform locations follow first declaration (vertex stage first).
/// Attributes keep the location the vertex stage declares.
///
/// # Errors
///
/// - `ProgramLinkFailed` when a uniform is declared with different types in
///   both stages, a fragment input is not written by the vertex stage, or
///   an attribute is not a scalar or vector
/// - `ProgramValidationFailed` when `validate` is set and the vertex stage
///   never writes `gl_Position`
pub(crate) fn link(
    vertex: &StageInterface,
    fragment: &StageInterface,
    validate: bool,
) -> Result<ProgramReflection> {
    let mut reflection = ProgramReflection::empty();
    let mut by_name: FxHashMap<&str, UniformType> = FxHashMap::default();

    for (name, uniform_type) in vertex.uniforms.iter().chain(fragment.uniforms.iter()) {
        match by_name.get(name.as_str()) {
            Some(existing) if existing != uniform_type => {
                return Err(Error::ProgramLinkFailed(format!(
                    "uniform '{}' is declared as {:?} and {:?}",
                    name, existing, uniform_type
                )));
            }
            Some(_) => {}
            None => {
                by_name.insert(name.as_str(), *uniform_type);
                reflection.uniforms.push(UniformInfo {
                    name: name.clone(),
                    location: UniformLocation(reflection.uniforms.len() as u32),
                    uniform_type: *uniform_type,
                });
            }
        }
    }

    for input in &fragment.inputs {
        let matched = vertex
            .outputs
            .iter()
            .any(|output| output.location == input.location && output.components == input.components);
        if !matched {
            return Err(Error::ProgramLinkFailed(format!(
                "fragment input '{}' at location {} is not written by the vertex stage",
                input.name, input.location
            )));
        }
    }

    for input in &vertex.inputs {
        let components = input.components.ok_or_else(|| {
            Error::ProgramLinkFailed(format!("attribute '{}' is not a scalar or vector", input.name))
        })?;
        reflection.attributes.push(AttributeInfo {
            name: input.name.clone(),
            location: AttributeLocation(input.location),
            components,
        });
    }

    if validate && !vertex.writes_position {
        return Err(Error::ProgramValidationFailed(
            "vertex stage never writes gl_Position".to_string(),
        ));
    }

    Ok(reflection)
}

#[cfg(test)]
#[path = "glsl_reflection_tests.rs"]
mod tests;
