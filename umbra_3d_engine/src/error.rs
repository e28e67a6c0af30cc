//! Error types for the Umbra3D engine
//!
//! This module defines the error type used throughout the engine, covering
//! graphics-device failures, resource misconfiguration and broken preconditions.

use std::fmt;

/// Result type for Umbra3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Umbra3D engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Graphics-device call failed (backend-specific message with call context)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, render target, shader, mesh, etc.)
    InvalidResource(String),

    /// Initialization failed (renderer, shadow target, subsystems)
    InitializationFailed(String),

    /// A frame precondition does not hold (e.g. lights but no active camera)
    InvalidState(String),

    /// A mesh lacks a vertex attribute required by the bound shader
    MissingVertexAttribute {
        /// Name of the offending mesh
        mesh: String,
        /// Name of the missing vertex attribute (e.g. "position")
        attribute: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::MissingVertexAttribute { mesh, attribute } => {
                write!(f, "Mesh '{}' has no {} stream", mesh, attribute)
            }
        }
    }
}

impl std::error::Error for Error {}

impl Error {
    /// True for configuration errors that a shading pass may skip over.
    ///
    /// The depth-only pipeline treats the same errors as fatal.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::MissingVertexAttribute { .. })
    }
}

// ===== ERROR MACROS =====

/// Build an `Error::BackendError`, logging it at ERROR level with file:line
///
/// # Example
///
/// ```no_run
/// # use umbra_3d_engine::engine_err;
/// let err = engine_err!("umbra3d::Renderer", "set_viewport({}x{}) failed", 800, 600);
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::umbra3d::Error::BackendError(message)
    }};
}

/// Log and return an `Error::BackendError` from the current function
///
/// # Example
///
/// ```no_run
/// # use umbra_3d_engine::engine_bail;
/// fn draw() -> umbra_3d_engine::umbra3d::Result<()> {
///     engine_bail!("umbra3d::Renderer", "draw called without a bound program");
/// }
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
