use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::config::error::ConfigError;

/// Supported settings file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml)
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }

    fn name(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "JSON",
            ConfigFormat::Yaml => "YAML",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "TOML",
        }
    }
}

/// Where one game's files live.
///
/// Relative paths are used as given; callers resolve them against whatever
/// base directory they choose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSettings {
    /// Display name of the game
    pub name: String,
    /// Directory holding the plugin files
    pub data_path: PathBuf,
    pub masterlist_path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prelude_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub userlist_path: Option<PathBuf>,
    /// The game's main master file, which always loads first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_file: Option<String>,
}

impl GameSettings {
    pub fn new(name: &str, data_path: impl Into<PathBuf>, masterlist_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            data_path: data_path.into(),
            masterlist_path: masterlist_path.into(),
            prelude_path: None,
            userlist_path: None,
            master_file: None,
        }
    }

    pub fn with_prelude(mut self, path: impl Into<PathBuf>) -> Self {
        self.prelude_path = Some(path.into());
        self
    }

    pub fn with_userlist(mut self, path: impl Into<PathBuf>) -> Self {
        self.userlist_path = Some(path.into());
        self
    }

    pub fn with_master_file(mut self, name: &str) -> Self {
        self.master_file = Some(name.to_string());
        self
    }

    /// Serialize to string based on format
    pub fn serialize(&self, format: ConfigFormat) -> Result<String, ConfigError> {
        let serialization_error = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::Serialization {
            format: format.name().to_string(),
            source,
        };
        match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self).map_err(|e| serialization_error(Box::new(e))),
            ConfigFormat::Yaml => serde_yaml::to_string(self).map_err(|e| serialization_error(Box::new(e))),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::to_string_pretty(self).map_err(|e| serialization_error(Box::new(e))),
        }
    }

    /// Deserialize from string based on format
    pub fn deserialize(data: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let deserialization_error = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::Deserialization {
            format: format.name().to_string(),
            source,
        };
        match format {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| deserialization_error(Box::new(e))),
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| deserialization_error(Box::new(e))),
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| deserialization_error(Box::new(e))),
        }
    }

    /// Loads settings, picking the format from the file extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
        let data = fs::read_to_string(path).map_err(|e| ConfigError::io(e, "read_to_string", path.to_path_buf()))?;
        let settings = Self::deserialize(&data, format)?;
        log::debug!("Loaded settings for '{}' from {}", settings.name, path.display());
        Ok(settings)
    }

    /// Saves settings atomically, picking the format from the file extension.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
        let data = self.serialize(format)?;

        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::io(e, "create_dir_all", parent.to_path_buf()))?;
        }

        let mut temp_file =
            NamedTempFile::new_in(parent).map_err(|e| ConfigError::io(e, "create_temp_file", parent.to_path_buf()))?;
        temp_file
            .write_all(data.as_bytes())
            .map_err(|e| ConfigError::io(e, "write_to_temp_file", temp_file.path().to_path_buf()))?;
        temp_file
            .persist(path)
            .map_err(|e| ConfigError::io(e.error, "persist_temp_file", path.to_path_buf()))?;

        Ok(())
    }
}
