use std::fmt;

/// Why one node of a graph must load before the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeType {
    /// Declared in the later plugin's header as one of its masters
    Master,
    /// The earlier plugin is master-flagged and the later one is not
    MasterFlag,
    MasterlistRequirement,
    UserRequirement,
    MasterlistLoadAfter,
    UserLoadAfter,
    /// The plugins' groups are ordered
    Group,
    MasterlistGroupAfter,
    UserGroupAfter,
}

impl fmt::Display for EdgeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EdgeType::Master => "Master",
            EdgeType::MasterFlag => "Master Flag",
            EdgeType::MasterlistRequirement => "Masterlist Requirement",
            EdgeType::UserRequirement => "User Requirement",
            EdgeType::MasterlistLoadAfter => "Masterlist Load After",
            EdgeType::UserLoadAfter => "User Load After",
            EdgeType::Group => "Group",
            EdgeType::MasterlistGroupAfter => "Masterlist Group After",
            EdgeType::UserGroupAfter => "User Group After",
        };
        write!(f, "{}", label)
    }
}

/// One element of a path or cycle.
///
/// `out_edge_type` describes the edge to the following element. The last
/// element of a path has none; in a cycle it points back to the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vertex {
    pub name: String,
    pub out_edge_type: Option<EdgeType>,
}

impl Vertex {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            out_edge_type: None,
        }
    }

    pub fn with_edge(name: &str, out_edge_type: EdgeType) -> Self {
        Self {
            name: name.to_string(),
            out_edge_type: Some(out_edge_type),
        }
    }
}

/// Renders vertices as `A --[Type]--> B --[Type]--> C`.
pub fn describe_vertices(vertices: &[Vertex]) -> String {
    let mut description = String::new();
    for vertex in vertices {
        description.push_str(&vertex.name);
        if let Some(edge_type) = vertex.out_edge_type {
            description.push_str(&format!(" --[{}]--> ", edge_type));
        }
    }
    if let (Some(first), Some(last)) = (vertices.first(), vertices.last()) {
        // A cycle ends with an edge back to its start.
        if last.out_edge_type.is_some() {
            description.push_str(&first.name);
        }
    }
    description
}
