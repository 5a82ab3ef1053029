//! # Plugsort Core Configuration
//!
//! Per-game settings: where the data directory, masterlist, prelude and
//! userlist live, and which plugin is the game's main master file.
//!
//! Settings files are JSON, YAML or (with the `toml-config` feature) TOML; the
//! format is chosen by file extension through [`ConfigFormat`].
pub mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::{ConfigFormat, GameSettings};
