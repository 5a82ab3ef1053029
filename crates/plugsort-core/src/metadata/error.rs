//! # Plugsort Core Metadata Errors
//!
//! [`MetadataError`] covers everything that can go wrong while turning
//! masterlist or userlist text into a [`MetadataList`](super::MetadataList),
//! or back again.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to parse metadata from '{origin}': {source}")]
    Syntax {
        origin: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("More than one entry exists for plugin \"{0}\"")]
    DuplicatePlugin(String),

    #[error("More than one definition exists for group \"{0}\"")]
    DuplicateGroup(String),

    #[error("Invalid regex in plugin entry \"{name}\": {source}")]
    InvalidRegex {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to serialize metadata: {0}")]
    Serialization(#[source] serde_yaml::Error),

    #[error("I/O error during operation '{operation}' on path '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

impl MetadataError {
    pub fn io(source: std::io::Error, operation: impl Into<String>, path: PathBuf) -> Self {
        MetadataError::Io {
            source,
            operation: operation.into(),
            path,
        }
    }
}
