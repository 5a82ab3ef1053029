//! # Plugsort Core Database
//!
//! [`Database`] owns a game's masterlist and userlist and answers queries over
//! the two: merged plugin metadata, merged groups, Bash Tags, global messages
//! and group paths. It also writes the userlist and the minimal list back out.
//!
//! Condition-aware queries delegate to the game's shared
//! [`ConditionEvaluator`](crate::condition::ConditionEvaluator).
pub mod store;

pub use store::{merge_groups, Database};
