//! # Plugsort Core Config Errors
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing game settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unsupported settings file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("I/O error during {operation} on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize settings to {format}: {source}")]
    Serialization {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to deserialize settings from {format}: {source}")]
    Deserialization {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl ConfigError {
    pub fn io(source: std::io::Error, operation: &str, path: PathBuf) -> Self {
        ConfigError::Io {
            path,
            operation: operation.to_string(),
            source,
        }
    }
}
