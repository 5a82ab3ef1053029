use serde::{Deserialize, Deserializer, Serialize};

/// Cleaning information for one version of a plugin, identified by its CRC.
///
/// Used both for dirty records (the plugin needs cleaning) and clean records
/// (the plugin has been verified clean).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginCleaningData {
    #[serde(deserialize_with = "deserialize_crc")]
    pub crc: u32,
    /// Name of the utility used to check or clean the plugin
    #[serde(rename = "util")]
    pub utility: String,
    /// Identical-to-master record count
    #[serde(rename = "itm", default, skip_serializing_if = "is_zero")]
    pub itm_count: u32,
    /// Deleted reference count
    #[serde(rename = "udr", default, skip_serializing_if = "is_zero")]
    pub deleted_reference_count: u32,
    /// Deleted navmesh count
    #[serde(rename = "nav", default, skip_serializing_if = "is_zero")]
    pub deleted_navmesh_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl PluginCleaningData {
    pub fn new(crc: u32, utility: &str) -> Self {
        Self {
            crc,
            utility: utility.to_string(),
            ..Self::default()
        }
    }

    pub fn with_counts(mut self, itm: u32, udr: u32, nav: u32) -> Self {
        self.itm_count = itm;
        self.deleted_reference_count = udr;
        self.deleted_navmesh_count = nav;
        self
    }
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}

/// Accepts a CRC written as an integer or as a hex string (`0x1A2B3C4D` or `1A2B3C4D`).
fn deserialize_crc<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum CrcRepr {
        Number(u32),
        Text(String),
    }

    match CrcRepr::deserialize(deserializer)? {
        CrcRepr::Number(crc) => Ok(crc),
        CrcRepr::Text(text) => {
            let digits = text.trim_start_matches("0x").trim_start_matches("0X");
            u32::from_str_radix(digits, 16)
                .map_err(|e| serde::de::Error::custom(format!("invalid CRC '{}': {}", text, e)))
        }
    }
}
