use serde::{Deserialize, Serialize};

use crate::kernel::constants::DEFAULT_GROUP;

/// A named group of plugins.
///
/// Plugins in a group load after the plugins of every group named in
/// `after_groups`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(rename = "after", default, skip_serializing_if = "Vec::is_empty")]
    pub after_groups: Vec<String>,
}

impl Group {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            after_groups: Vec::new(),
        }
    }

    pub fn with_after(name: &str, after_groups: &[&str]) -> Self {
        Self {
            after_groups: after_groups.iter().map(|g| g.to_string()).collect(),
            ..Self::new(name)
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }
}

impl Default for Group {
    fn default() -> Self {
        Self::new(DEFAULT_GROUP)
    }
}
