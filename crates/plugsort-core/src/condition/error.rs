//! # Plugsort Core Condition Errors
//!
//! Errors raised while parsing or evaluating condition strings. Every variant
//! carries the offending condition so it can be reported as-is.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConditionError {
    #[error("Failed to parse condition \"{condition}\" at position {position}: {reason}")]
    Syntax {
        condition: String,
        position: usize,
        reason: String,
    },

    #[error("Invalid path \"{path}\" in condition \"{condition}\": it points outside the game directory")]
    UnsafePath { condition: String, path: String },

    #[error("Invalid regex \"{pattern}\" in condition \"{condition}\": {source}")]
    InvalidRegex {
        condition: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to read '{path}' while evaluating condition \"{condition}\": {source}")]
    Io {
        condition: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConditionError {
    pub fn syntax(condition: &str, position: usize, reason: impl Into<String>) -> Self {
        ConditionError::Syntax {
            condition: condition.to_string(),
            position,
            reason: reason.into(),
        }
    }

    /// The condition string that failed.
    pub fn condition(&self) -> &str {
        match self {
            ConditionError::Syntax { condition, .. }
            | ConditionError::UnsafePath { condition, .. }
            | ConditionError::InvalidRegex { condition, .. }
            | ConditionError::Io { condition, .. } => condition,
        }
    }
}
