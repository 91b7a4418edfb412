//! Error types for the Prism3D engine
//!
//! This module defines the error types used throughout the engine,
//! including camera construction, render queue submission, and resource management.

use std::fmt;

/// Result type for Prism3D engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Prism3D engine errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Caller passed a value the operation cannot accept
    InvalidArgument(String),

    /// A collaborator the operation needs is not attached (device, camera, shader)
    MissingDependency(String),

    /// Invalid resource (mesh, shader, draw buffer, etc.)
    InvalidResource(String),

    /// Graphics backend error or poisoned shared state
    BackendError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Error::MissingDependency(msg) => write!(f, "Missing dependency: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ===== ERROR MACROS =====

/// Build an [`Error`] and log it at ERROR severity (with file:line)
///
/// # Example
///
/// ```ignore
/// return Err(engine_err!("prism3d::Camera", InvalidArgument, "near must be > 0, got {}", near));
/// ```
#[macro_export]
macro_rules! engine_err {
    ($source:expr, $kind:ident, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::engine_error!($source, "{}", message);
        $crate::prism3d::Error::$kind(message)
    }};
}

/// Log an error and return it from the current function
///
/// # Example
///
/// ```ignore
/// engine_bail!("prism3d::MeshLibrary", InvalidResource, "Mesh '{}' already loaded", name);
/// ```
#[macro_export]
macro_rules! engine_bail {
    ($source:expr, $kind:ident, $($arg:tt)*) => {
        return Err($crate::engine_err!($source, $kind, $($arg)*))
    };
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
