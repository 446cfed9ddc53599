//! Error types for the Lumen3D engine
//!
//! This module defines the error types used throughout the engine,
//! including device initialization, program compilation, and scene
//! management.

use std::fmt;
use crate::graphics_device::ShaderStage;

/// Result type for Lumen3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Lumen3D engine errors
#[derive(Debug, Clone)]
pub enum Error {
    /// Backend-specific error
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (geometry, node key, uniform type, etc.)
    InvalidResource(String),

    /// Initialization failed (engine, device, subsystems)
    InitializationFailed(String),

    /// No device context could be obtained from the surface
    DeviceUnavailable(String),

    /// A shader stage failed to compile. Carries the backend log.
    ShaderCompilationFailed {
        stage: ShaderStage,
        log: String,
    },

    /// The program failed to link. Carries the backend log.
    ProgramLinkFailed(String),

    /// The program failed validation. Carries the backend log.
    ProgramValidationFailed(String),
}

impl Error {
    /// Whether this error blocks startup (device or program creation).
    ///
    /// Callers must not retry these; there is no recovery path in the engine.
    pub fn is_fatal_initialization(&self) -> bool {
        matches!(
            self,
            Error::InitializationFailed(_)
                | Error::DeviceUnavailable(_)
                | Error::ShaderCompilationFailed { .. }
                | Error::ProgramLinkFailed(_)
                | Error::ProgramValidationFailed(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::DeviceUnavailable(msg) => write!(f, "Device unavailable: {}", msg),
            Error::ShaderCompilationFailed { stage, log } => {
                write!(f, "Shader compilation failed ({:?}): {}", stage, log)
            }
            Error::ProgramLinkFailed(log) => write!(f, "Program linking failed: {}", log),
            Error::ProgramValidationFailed(log) => write!(f, "Program validation failed: {}", log),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
