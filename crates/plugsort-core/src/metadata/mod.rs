//! # Plugsort Core Metadata
//!
//! In-memory model of masterlist and userlist content, and the rules for
//! combining the two.
//!
//! ## Key Submodules and Responsibilities:
//!
//! - **[`plugin`]**: [`PluginMetadata`], the per-plugin record, and its merge rule.
//! - **[`group`]**: [`Group`], a named bucket of plugins with "after" relations.
//! - **[`file`]**, **[`tag`]**, **[`message`]**, **[`cleaning`]**, **[`location`]**:
//!   the list elements carried by a plugin record.
//! - **[`list`]**: [`MetadataList`], one parsed masterlist or userlist, with YAML
//!   loading (including prelude splicing) and saving.
//! - **[`merge`]**: the append-unique merge shared by every list-valued field.
//! - **[`error`]**: [`MetadataError`] for malformed or inconsistent content.
pub mod cleaning;
pub mod error;
pub mod file;
pub mod group;
pub mod list;
pub mod location;
pub mod merge;
pub mod message;
pub mod plugin;
pub mod tag;

pub use cleaning::PluginCleaningData;
pub use error::MetadataError;
pub use file::File;
pub use group::Group;
pub use list::MetadataList;
pub use location::Location;
pub use merge::merge_vectors;
pub use message::{Message, MessageContent, MessageType};
pub use plugin::PluginMetadata;
pub use tag::Tag;

/// A metadata element that may be guarded by a condition string.
pub trait Conditional {
    /// The raw condition, if any.
    fn condition(&self) -> Option<&str>;

    /// True when a non-empty condition is attached.
    fn is_conditional(&self) -> bool {
        self.condition().is_some_and(|c| !c.is_empty())
    }
}

/// Case-insensitive comparison used for plugin identity.
pub(crate) fn names_equal(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}

// Test module declaration
#[cfg(test)]
mod tests;
