//! Unit tests for error.rs
//!
//! Tests Error variants, their Display output, and the fatal classification.

use crate::error::{Error, Result};
use crate::graphics_device::ShaderStage;

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("context lost".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("context lost"));
}

#[test]
fn test_out_of_memory_display() {
    let err = Error::OutOfMemory;
    assert_eq!(format!("{}", err), "Out of GPU memory");
}

#[test]
fn test_invalid_resource_display() {
    let err = Error::InvalidResource("node key not found".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Invalid resource"));
    assert!(display.contains("node key not found"));
}

#[test]
fn test_shader_compilation_failed_display_carries_log() {
    let err = Error::ShaderCompilationFailed {
        stage: ShaderStage::Fragment,
        log: "ERROR: 0:12: 'vec5' : undeclared identifier".to_string(),
    };
    let display = format!("{}", err);
    assert!(display.contains("Shader compilation failed"));
    assert!(display.contains("Fragment"));
    assert!(display.contains("vec5"));
}

#[test]
fn test_program_link_and_validation_display() {
    let link = Error::ProgramLinkFailed("varying mismatch".to_string());
    assert!(format!("{}", link).contains("Program linking failed: varying mismatch"));

    let validation = Error::ProgramValidationFailed("sampler conflict".to_string());
    assert!(format!("{}", validation).contains("Program validation failed: sampler conflict"));
}

#[test]
fn test_device_unavailable_display() {
    let err = Error::DeviceUnavailable("webgl2 not supported".to_string());
    assert!(format!("{}", err).contains("webgl2 not supported"));
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

#[test]
fn test_fatal_initialization_classification() {
    assert!(Error::DeviceUnavailable("x".to_string()).is_fatal_initialization());
    assert!(Error::InitializationFailed("x".to_string()).is_fatal_initialization());
    assert!(Error::ProgramLinkFailed("x".to_string()).is_fatal_initialization());
    assert!(Error::ProgramValidationFailed("x".to_string()).is_fatal_initialization());
    assert!(Error::ShaderCompilationFailed {
        stage: ShaderStage::Vertex,
        log: String::new(),
    }
    .is_fatal_initialization());

    assert!(!Error::BackendError("x".to_string()).is_fatal_initialization());
    assert!(!Error::InvalidResource("x".to_string()).is_fatal_initialization());
    assert!(!Error::OutOfMemory.is_fatal_initialization());
}

// ============================================================================
// ERROR TRAIT IMPLEMENTATIONS
// ============================================================================

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

#[test]
fn test_error_debug() {
    let debug = format!("{:?}", Error::ProgramLinkFailed("log".to_string()));
    assert!(debug.contains("ProgramLinkFailed"));

    let debug = format!("{:?}", Error::ShaderCompilationFailed {
        stage: ShaderStage::Vertex,
        log: "log".to_string(),
    });
    assert!(debug.contains("ShaderCompilationFailed"));
    assert!(debug.contains("Vertex"));
}

#[test]
fn test_error_clone() {
    let err1 = Error::ShaderCompilationFailed {
        stage: ShaderStage::Vertex,
        log: "missing main".to_string(),
    };
    let err2 = err1.clone();
    assert_eq!(format!("{}", err1), format!("{}", err2));
}

// ============================================================================
// RESULT TYPE TESTS
// ============================================================================

#[test]
fn test_error_propagation_with_question_mark() {
    fn inner() -> Result<i32> {
        Err(Error::ProgramLinkFailed("boom".to_string()))
    }

    fn outer() -> Result<i32> {
        inner()?;
        Ok(42)
    }

    match outer() {
        Err(Error::ProgramLinkFailed(log)) => assert_eq!(log, "boom"),
        other => panic!("unexpected result: {:?}", other),
    }
}
