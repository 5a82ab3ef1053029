//! # Plugsort Core Conditions
//!
//! Condition strings gate metadata entries on facts about the installation:
//! which files exist, which plugins are active, file checksums and versions.
//!
//! ## Key Submodules and Responsibilities:
//!
//! - **[`parser`]**: turns a condition string into an [`Expression`].
//! - **[`evaluator`]**: [`ConditionEvaluator`] evaluates expressions against the
//!   shared [`InstallState`](crate::install::InstallState), memoizing results
//!   per condition string until the cache is cleared.
//! - **[`version`]**: lenient version parsing and the comparison operators used
//!   by `version(...)` conditions.
//! - **[`error`]**: [`ConditionError`].
pub mod error;
pub mod evaluator;
pub mod parser;
pub mod version;

pub use error::ConditionError;
pub use evaluator::ConditionEvaluator;
pub use parser::{parse_condition, Expression, Function, PathSpec};
pub use version::{Comparator, Version};

// Test module declaration
#[cfg(test)]
mod tests;
