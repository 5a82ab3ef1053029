//! # Plugsort Core Sorting Errors
use thiserror::Error;

use crate::sorting::vertex::{describe_vertices, Vertex};

#[derive(Debug, Error)]
pub enum SortingError {
    /// The graph being sorted is cyclic. Carries the cycle in load order,
    /// each vertex pointing at the next and the last back at the first.
    #[error("Cyclic interaction detected: {}", describe_vertices(.0))]
    Cycle(Vec<Vertex>),

    #[error("The group \"{0}\" does not exist")]
    UndefinedGroup(String),
}

impl SortingError {
    /// The cycle, when this is a cycle error.
    pub fn cycle(&self) -> Option<&[Vertex]> {
        match self {
            SortingError::Cycle(vertices) => Some(vertices),
            SortingError::UndefinedGroup(_) => None,
        }
    }
}
