//! # Plugsort Core Kernel Errors
//!
//! Defines the top-level error type of the engine.
//!
//! [`Error`] wraps the typed errors of each subsystem ([`MetadataError`],
//! [`ConditionError`], [`SortingError`], [`ConfigError`]) and adds the
//! file-access failures raised by the database when loading or writing lists.
use std::path::PathBuf;
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::condition::error::ConditionError;
use crate::config::error::ConfigError;
use crate::metadata::error::MetadataError;
use crate::sorting::error::SortingError;

/// Custom error type for the load order engine
#[derive(Debug, ThisError)]
pub enum Error {
    /// A load or write target is missing, or a write target exists and
    /// overwriting was not allowed.
    #[error("File access error for '{}': {message}", path.display())]
    FileAccess { path: PathBuf, message: String },

    /// Malformed masterlist or userlist content
    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    /// Unparsable condition or failed installation probe
    #[error("Condition error: {0}")]
    Condition(#[from] ConditionError),

    /// Cyclic interaction or undefined group found while sorting
    #[error("Sorting error: {0}")]
    Sorting(#[from] SortingError),

    /// Game settings could not be read or written
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error during operation '{operation}' on path '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl Error {
    pub fn file_access(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::FileAccess {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn io(source: std::io::Error, operation: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Error::Io {
            source,
            operation: operation.into(),
            path: path.into(),
        }
    }

    /// Returns the cycle members if this error reports a cyclic interaction.
    pub fn cycle(&self) -> Option<&[crate::sorting::Vertex]> {
        match self {
            Error::Sorting(SortingError::Cycle(vertices)) => Some(vertices),
            _ => None,
        }
    }
}
