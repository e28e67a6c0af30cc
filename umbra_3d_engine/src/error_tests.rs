//! Unit tests for error.rs
//!
//! Tests Error variants, Display output, and the engine_err!/engine_bail! macros.

use crate::error::{Error, Result};

// ============================================================================
// ERROR DISPLAY TESTS
// ============================================================================

#[test]
fn test_backend_error_display() {
    let err = Error::BackendError("set_viewport(0, 0, 800, 600) rejected".to_string());
    let display = format!("{}", err);
    assert!(display.contains("Backend error"));
    assert!(display.contains("set_viewport(0, 0, 800, 600)"));
}

#[test]
fn test_out_of_memory_display() {
    assert_eq!(format!("{}", Error::OutOfMemory), "Out of GPU memory");
}

#[test]
fn test_invalid_state_display() {
    let err = Error::InvalidState("scene has lights but no active camera".to_string());
    let display = format!("{}", err);
    assert!(display.starts_with("Invalid state"));
    assert!(display.contains("no active camera"));
}

#[test]
fn test_missing_vertex_attribute_display() {
    let err = Error::MissingVertexAttribute {
        mesh: "floor".to_string(),
        attribute: "position",
    };
    assert_eq!(format!("{}", err), "Mesh 'floor' has no position stream");
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

#[test]
fn test_configuration_error_classification() {
    let config = Error::MissingVertexAttribute {
        mesh: "m".to_string(),
        attribute: "normal",
    };
    assert!(config.is_configuration_error());
    assert!(!Error::BackendError("x".to_string()).is_configuration_error());
    assert!(!Error::InvalidState("x".to_string()).is_configuration_error());
}

#[test]
fn test_error_is_std_error() {
    let err = Error::OutOfMemory;
    let _: &dyn std::error::Error = &err;
}

// ============================================================================
// MACROS
// ============================================================================

#[test]
fn test_engine_err_builds_backend_error() {
    let err = crate::engine_err!("umbra3d::Test", "clear({}) failed", "DEPTH");
    assert_eq!(err, Error::BackendError("clear(DEPTH) failed".to_string()));
}

fn bail_helper(fail: bool) -> Result<u32> {
    if fail {
        crate::engine_bail!("umbra3d::Test", "bailing with code {}", 7);
    }
    Ok(1)
}

#[test]
fn test_engine_bail_returns_early() {
    assert_eq!(bail_helper(false), Ok(1));
    match bail_helper(true) {
        Err(Error::BackendError(msg)) => assert_eq!(msg, "bailing with code 7"),
        other => panic!("expected BackendError, got {:?}", other),
    }
}
