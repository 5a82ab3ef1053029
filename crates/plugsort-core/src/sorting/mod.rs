//! # Plugsort Core Sorting
//!
//! Turns merged plugin metadata and group relations into a load order.
//!
//! ## Key Submodules and Responsibilities:
//!
//! - **[`group_graph`]**: [`GroupGraph`], built from masterlist and userlist
//!   groups, with cycle checking and shortest load-order path queries.
//! - **[`plugin_graph`]**: [`PluginGraph`] over installed plugins. Edges come from
//!   header masters, master flags, explicit rules and group order; the order is
//!   produced by Kahn's algorithm with the current load order as tie-break.
//! - **[`vertex`]**: [`Vertex`] and [`EdgeType`], the elements of reported paths
//!   and cycles.
//! - **[`error`]**: [`SortingError`].
pub mod error;
pub mod group_graph;
pub mod plugin_graph;
pub mod vertex;

pub use error::SortingError;
pub use group_graph::{check_for_cycles, groups_path, GroupGraph};
pub use plugin_graph::{sort_plugins, sort_plugins_with_main_master, PluginGraph, PluginSortingData};
pub use vertex::{describe_vertices, EdgeType, Vertex};
