//! # Plugsort Core
//!
//! A load order engine for games whose content is packaged as plugin files.
//! Reads community (masterlist) and user (userlist) metadata, evaluates the
//! conditions attached to it against the installation, and sorts installed
//! plugins into an order that satisfies every rule.
pub mod condition;
pub mod config;
pub mod database;
pub mod install;
pub mod kernel;
pub mod metadata;
pub mod sorting;

// Re-export key public types for callers
pub use condition::{ConditionError, ConditionEvaluator};
pub use config::{ConfigFormat, GameSettings};
pub use database::Database;
pub use install::{InstallState, InstalledPlugin};
pub use kernel::error::{Error, Result};
pub use kernel::Game;
pub use metadata::{Group, Message, MetadataList, PluginMetadata};
pub use sorting::{EdgeType, SortingError, Vertex};

// Cross-module tests
#[cfg(test)]
mod tests;
