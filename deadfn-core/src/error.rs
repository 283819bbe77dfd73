//! Typed error handling for deadfn.
//!
//! Provides structured errors that library consumers can match on,
//! with full context about what went wrong and where.
//!
//! Note that locator failures (`NotFound`, `PrototypeOnly`, `Unbalanced`)
//! are *not* errors: they are structured results reported by
//! [`crate::locate`] and never abort an analysis.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for deadfn operations.
///
/// This provides typed errors that library consumers can match on,
/// unlike opaque `anyhow::Error` types.
#[derive(Error, Debug)]
pub enum DeadfnError {
    /// I/O error when reading input files
    #[error("I/O error at {path}: {message}")]
    Io {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration file errors
    #[error("Config error at {path}: {message}")]
    Config { path: PathBuf, message: String },

    /// Invalid argument provided (e.g. a malformed registration pattern)
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DeadfnError {
    /// Create an I/O error with path context.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create a config error.
    pub fn config(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Check if this is a recoverable error (can continue analysis).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Config { .. } | Self::InvalidArgument { .. })
    }

    /// Get the path associated with this error, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } => Some(path),
            Self::Config { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// Convenience type alias for deadfn results.
pub type DeadfnResult<T> = Result<T, DeadfnError>;

/// Extension trait for converting std::io::Error with path context.
pub trait IoResultExt<T> {
    /// Add path context to an I/O error.
    fn with_path(self, path: impl Into<PathBuf>) -> DeadfnResult<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> DeadfnResult<T> {
        self.map_err(|e| DeadfnError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error() {
        let err = DeadfnError::io(
            PathBuf::from("/data/callgraph.txt"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        assert!(matches!(err, DeadfnError::Io { .. }));
        assert_eq!(err.path(), Some(&PathBuf::from("/data/callgraph.txt")));
        assert!(err.to_string().contains("/data/callgraph.txt"));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(DeadfnError::config("/deadfn.toml", "bad toml").is_recoverable());
        assert!(DeadfnError::invalid_argument("bad pattern").is_recoverable());
        assert!(!DeadfnError::internal("broken invariant").is_recoverable());
    }

    #[test]
    fn test_io_result_ext() {
        let result: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        let deadfn_result = result.with_path("/missing/source.c");
        assert!(deadfn_result.is_err());
    }
}
