use serde::{Deserialize, Serialize};

use crate::metadata::Conditional;

/// A Bash Tag suggestion for a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TagRepr", into = "TagRepr")]
pub struct Tag {
    /// Tag name, without any removal prefix
    pub name: String,
    /// False when the suggestion is to remove the tag
    pub is_addition: bool,
    pub condition: Option<String>,
}

impl Tag {
    pub fn addition(name: &str) -> Self {
        Self {
            name: name.to_string(),
            is_addition: true,
            condition: None,
        }
    }

    pub fn removal(name: &str) -> Self {
        Self {
            is_addition: false,
            ..Self::addition(name)
        }
    }

    pub fn with_condition(mut self, condition: &str) -> Self {
        self.condition = Some(condition.to_string());
        self
    }

    /// Parses the prefixed form used in metadata files (`-Name` for removals).
    fn from_prefixed(prefixed: &str, condition: Option<String>) -> Self {
        match prefixed.strip_prefix('-') {
            Some(name) => Self { name: name.to_string(), is_addition: false, condition },
            None => Self { name: prefixed.to_string(), is_addition: true, condition },
        }
    }

    fn prefixed_name(&self) -> String {
        if self.is_addition {
            self.name.clone()
        } else {
            format!("-{}", self.name)
        }
    }
}

impl Conditional for Tag {
    fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TagRepr {
    Name(String),
    Conditional {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
    },
}

impl From<TagRepr> for Tag {
    fn from(repr: TagRepr) -> Self {
        match repr {
            TagRepr::Name(name) => Tag::from_prefixed(&name, None),
            TagRepr::Conditional { name, condition } => Tag::from_prefixed(&name, condition),
        }
    }
}

impl From<Tag> for TagRepr {
    fn from(tag: Tag) -> Self {
        let name = tag.prefixed_name();
        match tag.condition {
            None => TagRepr::Name(name),
            condition => TagRepr::Conditional { name, condition },
        }
    }
}
