//! # Plugsort Core Kernel
//!
//! The `kernel` module ties the subsystems together into a per-game engine
//! instance and provides the shared error type and constants.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Game Instance**: [`Game`](game::Game) owns a game's settings, installation
//!   state, condition evaluator, metadata database and load order, and runs
//!   full plugin sorts.
//! - **Core Constants**: names, extensions and markers used across the engine,
//!   in the `constants` submodule.
//! - **Error Handling**: the top-level [`Error`](error::Error) wrapping every
//!   subsystem error, and a `Result` alias, in the `error` submodule.
pub mod constants;
pub mod error;
pub mod game;

pub use error::{Error, Result};
pub use game::Game;

// Test module declaration
#[cfg(test)]
mod tests;
