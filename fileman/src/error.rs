//! Error types for fileman

use std::io;
use std::path::Path;
use thiserror::Error;

/// Result type alias for fileman operations
pub type FmResult<T> = Result<T, FmError>;

/// Error types for shell operations
#[derive(Error, Debug)]
pub enum FmError {
    /// Missing or malformed command arguments
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Path does not exist
    #[error("No such file or directory: {0}")]
    NotFound(String),

    /// Exclusive-create conflict
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// `cd` target exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// Directory passed to a single-file operation
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Underlying read/write/rename/delete/transform failure
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    /// Writing to the shell's own output failed
    #[error("IO error: {0}")]
    Output(#[from] io::Error),

    /// Command name not in the registry
    #[error("Unknown operation: {0}")]
    UnknownCommand(String),

    /// Exit requested (not really an error)
    #[error("Exit with code {0}")]
    Exit(i32),
}

impl FmError {
    /// Wrap an I/O failure, keeping the operation or path as context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        FmError::Io {
            context: context.into(),
            source,
        }
    }

    /// Like [`FmError::io`], but surfaces not-found and already-exists
    /// conditions as their own variants.
    pub fn from_io_kind(path: &Path, source: io::Error) -> Self {
        let shown = path.display().to_string();
        match source.kind() {
            io::ErrorKind::NotFound => FmError::NotFound(shown),
            io::ErrorKind::AlreadyExists => FmError::AlreadyExists(shown),
            _ => FmError::io(shown, source),
        }
    }
}
