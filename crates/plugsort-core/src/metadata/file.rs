use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metadata::{names_equal, Conditional};

/// A reference to another plugin, as used by "load after", "requires" and
/// "incompatible with" rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "FileRepr", into = "FileRepr")]
pub struct File {
    /// Referenced plugin file name
    pub name: String,
    /// Name shown to users instead of the file name
    pub display: Option<String>,
    /// Condition under which the reference applies
    pub condition: Option<String>,
}

impl File {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            display: None,
            condition: None,
        }
    }

    pub fn with_condition(name: &str, condition: &str) -> Self {
        Self {
            condition: Some(condition.to_string()),
            ..Self::new(name)
        }
    }

    pub fn display_name(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.name)
    }
}

impl Conditional for File {
    fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }
}

// File names compare case-insensitively; display and condition must match exactly.
impl PartialEq for File {
    fn eq(&self, other: &Self) -> bool {
        names_equal(&self.name, &other.name)
            && self.display == other.display
            && self.condition == other.condition
    }
}

impl Eq for File {}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Wire form: a bare file name, or a map with optional display name and condition.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum FileRepr {
    Name(String),
    Detailed {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        display: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        condition: Option<String>,
    },
}

impl From<FileRepr> for File {
    fn from(repr: FileRepr) -> Self {
        match repr {
            FileRepr::Name(name) => File::new(&name),
            FileRepr::Detailed { name, display, condition } => File { name, display, condition },
        }
    }
}

impl From<File> for FileRepr {
    fn from(file: File) -> Self {
        if file.display.is_none() && file.condition.is_none() {
            FileRepr::Name(file.name)
        } else {
            FileRepr::Detailed {
                name: file.name,
                display: file.display,
                condition: file.condition,
            }
        }
    }
}
