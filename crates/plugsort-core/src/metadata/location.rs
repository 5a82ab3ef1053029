use serde::{Deserialize, Serialize};

/// A URL where a plugin can be found.
///
/// Serialized as a bare URL when it has no name, otherwise as a
/// `{link, name}` map. Any other shape is rejected on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LocationRepr", into = "LocationRepr")]
pub struct Location {
    pub url: String,
    pub name: String,
}

impl Location {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            name: String::new(),
        }
    }

    pub fn with_name(url: &str, name: &str) -> Self {
        Self {
            url: url.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum LocationRepr {
    Url(String),
    Named {
        link: String,
        #[serde(default, skip_serializing_if = "String::is_empty")]
        name: String,
    },
}

impl From<LocationRepr> for Location {
    fn from(repr: LocationRepr) -> Self {
        match repr {
            LocationRepr::Url(url) => Location::new(&url),
            LocationRepr::Named { link, name } => Location { url: link, name },
        }
    }
}

impl From<Location> for LocationRepr {
    fn from(location: Location) -> Self {
        if location.name.is_empty() {
            LocationRepr::Url(location.url)
        } else {
            LocationRepr::Named {
                link: location.url,
                name: location.name,
            }
        }
    }
}
