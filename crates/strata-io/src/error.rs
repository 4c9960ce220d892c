//! I/O error types.

use std::path::{Path, PathBuf};

/// Errors produced by a file system backend.
///
/// The environment adapter in `strata-env` passes these through untouched, so
/// this is the single error taxonomy seen by both interface layers.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Underlying OS I/O error.
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// File or directory not found.
    #[error("file not found: {path}")]
    NotFound { path: PathBuf },

    /// The backend does not implement the operation.
    #[error("operation not supported: {operation}")]
    NotSupported { operation: &'static str },

    /// The caller passed an argument the backend rejects.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Data failed an integrity check.
    #[error("corruption: {0}")]
    Corruption(String),

    /// The resource is held by someone else.
    #[error("resource busy: {0}")]
    Busy(String),

    /// The request exceeded its deadline.
    #[error("operation timed out")]
    TimedOut,

    /// The request was abandoned before completion.
    #[error("operation aborted: {0}")]
    Aborted(String),
}

impl IoError {
    /// Builds a `NotSupported` error for the named operation.
    pub fn not_supported(operation: &'static str) -> Self {
        Self::NotSupported { operation }
    }

    /// Maps an OS error raised while touching `path`.
    ///
    /// `ErrorKind::NotFound` becomes [`IoError::NotFound`] so callers can
    /// match on the path; everything else is kept as [`IoError::Io`].
    pub fn from_io(source: std::io::Error, path: &Path) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io { source }
        }
    }

    /// Returns true if this is a [`IoError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result alias used throughout the file system interface.
pub type IoResult<T> = Result<T, IoError>;
