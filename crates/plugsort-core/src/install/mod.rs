//! # Plugsort Core Installation State
//!
//! The engine's view of the game installation: where the data directory is,
//! which plugins the scanner found there, and which of them are active.
//!
//! Plugin files are never parsed here. The scanner that reads plugin headers
//! lives outside the engine and hands over [`InstalledPlugin`] records.
pub mod plugin;
pub mod state;

pub use plugin::InstalledPlugin;
pub use state::{InstallState, SharedInstallState};
