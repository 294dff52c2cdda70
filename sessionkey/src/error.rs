//! Error types for sessionkey.
//!
//! This module defines the error types used throughout the crate, providing
//! structured error handling with clear, human-readable messages.

use thiserror::Error;

/// Errors that can occur during sessionkey operations.
///
/// Returned by the operations that combine key derivation with filesystem
/// access, such as [`crate::projects::sessions_for_path`]. Pure key
/// derivation returns [`KeyError`] directly.
#[derive(Error, Debug)]
pub enum SessionKeyError {
    /// Key derivation error.
    #[error(transparent)]
    Key(#[from] KeyError),

    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a raw path could not be turned into a canonical key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidPathReason {
    /// The path is empty or only whitespace.
    Empty,
    /// The path contains a NUL character.
    NulByte,
    /// The path starts with `~` but no home directory is configured.
    UnresolvedHome,
}

impl std::fmt::Display for InvalidPathReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            Self::Empty => "path is empty",
            Self::NulByte => "path contains a NUL byte",
            Self::UnresolvedHome => "no home directory to expand '~' against",
        };
        f.write_str(msg)
    }
}

/// Errors produced while deriving canonical keys and project keys.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The raw path cannot be interpreted as a path.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        path: String,
        reason: InvalidPathReason,
    },

    /// The machine identifier is empty.
    #[error("machine id cannot be empty")]
    InvalidMachineId,

    /// A string could not be parsed back into a project key.
    #[error("invalid project key '{0}'")]
    InvalidProjectKey(String),
}

impl KeyError {
    pub(crate) fn invalid_path(path: &str, reason: InvalidPathReason) -> Self {
        Self::InvalidPath {
            path: path.to_string(),
            reason,
        }
    }
}

/// A specialized `Result` type for sessionkey operations.
pub type Result<T> = std::result::Result<T, SessionKeyError>;
