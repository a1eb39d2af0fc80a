//! Error types for the parts around the operation engine.
//!
//! The engine itself never propagates errors: every failure inside a mass
//! action is resolved to a verdict through the user prompt. `FmError` covers
//! panel listing, configuration, and the front end.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading panels or loading configuration.
#[derive(Debug, Error)]
pub enum FmError {
    /// Permission denied for a path.
    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    /// Path not found.
    #[error("Path not found: {path}")]
    NotFound { path: PathBuf },

    /// Panel root is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Generic I/O error.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl FmError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied { path },
            std::io::ErrorKind::NotFound => Self::NotFound { path },
            _ => Self::Io { path, source },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_classification() {
        let err = FmError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, FmError::PermissionDenied { .. }));

        let err = FmError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(matches!(err, FmError::NotFound { .. }));

        let err = FmError::io(
            "/test/path",
            std::io::Error::new(std::io::ErrorKind::Other, "boom"),
        );
        assert!(matches!(err, FmError::Io { .. }));
    }

    #[test]
    fn test_display_includes_path() {
        let err = FmError::NotADirectory {
            path: PathBuf::from("/etc/passwd"),
        };
        assert!(err.to_string().contains("/etc/passwd"));
    }
}
