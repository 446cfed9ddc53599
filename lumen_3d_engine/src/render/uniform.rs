/// Uniform binders: typed CPU values mapped onto named program inputs.
///
/// A `Uniform` resolves its location once, at creation. A name the program
/// does not expose resolves to no location; setting it stores the value,
/// skips the upload and logs a warning the first time only.

use std::sync::Arc;
use rustc_hash::FxHashMap;
use crate::error::{Error, Result};
use crate::graphics_device::{GraphicsDevice, Program, UniformLocation, UniformType, UniformValue};

// ===== UNIFORM =====

/// One named, typed program input
pub struct Uniform {
    name: String,
    uniform_type: UniformType,
    location: Option<UniformLocation>,
    program: Arc<dyn Program>,
    value: Option<UniformValue>,
    warned: bool,
}

impl Uniform {
    /// Declare `name` with `uniform_type` on `program` and resolve its location
    pub fn new(program: &Arc<dyn Program>, name: impl Into<String>, uniform_type: UniformType) -> Self {
        let name = name.into();
        let location = program.uniform_location(&name);
        Self {
            name,
            uniform_type,
            location,
            program: Arc::clone(program),
            value: None,
            warned: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uniform_type(&self) -> UniformType {
        self.uniform_type
    }

    /// Resolved location, `None` when the program does not use the name
    pub fn location(&self) -> Option<UniformLocation> {
        self.location
    }

    /// Last value set, without touching the device
    pub fn value(&self) -> Option<&UniformValue> {
        self.value.as_ref()
    }

    /// Bind the owning program and upload `value`
    ///
    /// # Errors
    ///
    /// `InvalidResource` when the value type differs from the declared type.
    pub fn set(&mut self, device: &mut dyn GraphicsDevice, value: UniformValue) -> Result<()> {
        self.check_type(&value)?;
        if self.location.is_some() {
            device.use_program(&self.program)?;
        }
        self.upload(device, value)
    }

    /// Upload assuming the owning program is already bound
    pub(crate) fn upload(&mut self, device: &mut dyn GraphicsDevice, value: UniformValue) -> Result<()> {
        self.check_type(&value)?;
        match self.location {
            Some(location) => device.upload_uniform(location, &value)?,
            None => {
                if !self.warned {
                    self.warned = true;
                    crate::engine_warn!(
                        "lumen3d::Uniform",
                        "Uniform '{}' not found in program '{}', uploads skipped",
                        self.name,
                        self.program.label()
                    );
                }
            }
        }
        self.value = Some(value);
        Ok(())
    }

    fn check_type(&self, value: &UniformValue) -> Result<()> {
        let value_type = value.uniform_type();
        if value_type != self.uniform_type {
            return Err(Error::InvalidResource(format!(
                "Uniform '{}' is declared {} but was given {}",
                self.name,
                self.uniform_type.glsl_name(),
                value_type.glsl_name()
            )));
        }
        Ok(())
    }
}

// ===== UNIFORM SET =====

/// The binders of one program instance, keyed by name
pub struct UniformSet {
    program: Arc<dyn Program>,
    uniforms: FxHashMap<String, Uniform>,
}

impl UniformSet {
    pub fn new(program: &Arc<dyn Program>) -> Self {
        Self {
            program: Arc::clone(program),
            uniforms: FxHashMap::default(),
        }
    }

    /// Declare a binder, or return the existing one with the same type
    ///
    /// # Errors
    ///
    /// `InvalidResource` when `name` is already declared with another type.
    pub fn declare(&mut self, name: &str, uniform_type: UniformType) -> Result<&mut Uniform> {
        if let Some(existing) = self.uniforms.get(name) {
            if existing.uniform_type != uniform_type {
                return Err(Error::InvalidResource(format!(
                    "Uniform '{}' already declared as {}, cannot redeclare as {}",
                    name,
                    existing.uniform_type.glsl_name(),
                    uniform_type.glsl_name()
                )));
            }
        }
        let program = &self.program;
        Ok(self
            .uniforms
            .entry(name.to_string())
            .or_insert_with(|| Uniform::new(program, name, uniform_type)))
    }

    /// Set one value, declaring its binder from the value type if needed
    pub fn set(&mut self, device: &mut dyn GraphicsDevice, name: &str, value: UniformValue) -> Result<()> {
        self.declare(name, value.uniform_type())?.set(device, value)
    }

    /// Bind the program once, then upload every value in order
    pub fn apply<I>(&mut self, device: &mut dyn GraphicsDevice, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, UniformValue)>,
    {
        device.use_program(&self.program)?;
        self.upload_all(device, values)
    }

    /// Upload every value, assuming the program is already bound
    pub(crate) fn upload_all<I>(&mut self, device: &mut dyn GraphicsDevice, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, UniformValue)>,
    {
        for (name, value) in values {
            self.declare(&name, value.uniform_type())?.upload(device, value)?;
        }
        Ok(())
    }

    /// Last value set for `name`
    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms.get(name).and_then(|u| u.value())
    }

    pub fn uniform(&self, name: &str) -> Option<&Uniform> {
        self.uniforms.get(name)
    }

    pub fn len(&self) -> usize {
        self.uniforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.uniforms.is_empty()
    }
}

#[cfg(test)]
#[path = "uniform_tests.rs"]
mod tests;
