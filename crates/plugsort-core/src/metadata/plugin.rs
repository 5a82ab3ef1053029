use serde::{Deserialize, Serialize};

use crate::kernel::constants::{is_regex_name, DEFAULT_GROUP};
use crate::metadata::merge::merge_vectors;
use crate::metadata::{
    names_equal, File, Location, Message, PluginCleaningData, Tag,
};

/// Everything the metadata lists say about one plugin.
///
/// Identity is the plugin name, compared case-insensitively. A name
/// containing any of `: \ * ? |` is a regex entry that applies to every
/// plugin whose name it matches.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PluginMetadata {
    pub name: String,

    /// Explicitly assigned group. `None` means the plugin falls back to the
    /// default group, and lets a masterlist value show through a merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,

    #[serde(rename = "after", default, skip_serializing_if = "Vec::is_empty")]
    pub load_after: Vec<File>,

    #[serde(rename = "req", default, skip_serializing_if = "Vec::is_empty")]
    pub requirements: Vec<File>,

    #[serde(rename = "inc", default, skip_serializing_if = "Vec::is_empty")]
    pub incompatibilities: Vec<File>,

    #[serde(rename = "msg", default, skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<Message>,

    #[serde(rename = "tag", default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,

    #[serde(rename = "dirty", default, skip_serializing_if = "Vec::is_empty")]
    pub dirty_info: Vec<PluginCleaningData>,

    #[serde(rename = "clean", default, skip_serializing_if = "Vec::is_empty")]
    pub clean_info: Vec<PluginCleaningData>,

    #[serde(rename = "url", default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
}

impl PluginMetadata {
    /// Create an empty record for the named plugin
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// The effective group: the explicit one, or the default group.
    pub fn group(&self) -> &str {
        self.group.as_deref().unwrap_or(DEFAULT_GROUP)
    }

    pub fn set_group(&mut self, group: &str) -> &mut Self {
        self.group = Some(group.to_string());
        self
    }

    pub fn unset_group(&mut self) -> &mut Self {
        self.group = None;
        self
    }

    /// True if nothing but the name is set.
    pub fn has_name_only(&self) -> bool {
        self.group.is_none()
            && self.load_after.is_empty()
            && self.requirements.is_empty()
            && self.incompatibilities.is_empty()
            && self.messages.is_empty()
            && self.tags.is_empty()
            && self.dirty_info.is_empty()
            && self.clean_info.is_empty()
            && self.locations.is_empty()
    }

    pub fn is_regex_plugin(&self) -> bool {
        is_regex_name(&self.name)
    }

    /// Case-insensitive name comparison for exact entries.
    pub fn name_matches(&self, plugin_name: &str) -> bool {
        names_equal(&self.name, plugin_name)
    }

    /// Merges a masterlist record into this (userlist) record.
    ///
    /// The group is kept if this record sets one, and inherited otherwise.
    /// Every list field becomes the master's list followed by the entries of
    /// this record that the master's list does not already contain.
    pub fn merge_metadata(&mut self, master: &PluginMetadata) {
        if master.has_name_only() {
            return;
        }

        if self.group.is_none() {
            self.group = master.group.clone();
        }

        self.load_after = merge_vectors(master.load_after.clone(), &self.load_after);
        self.requirements = merge_vectors(master.requirements.clone(), &self.requirements);
        self.incompatibilities = merge_vectors(master.incompatibilities.clone(), &self.incompatibilities);
        self.messages = merge_vectors(master.messages.clone(), &self.messages);
        self.tags = merge_vectors(master.tags.clone(), &self.tags);
        self.dirty_info = merge_vectors(master.dirty_info.clone(), &self.dirty_info);
        self.clean_info = merge_vectors(master.clean_info.clone(), &self.clean_info);
        self.locations = merge_vectors(master.locations.clone(), &self.locations);
    }

    /// Appends the entries of `other` after this record's own, as used when
    /// folding regex entries into an exact entry. The group is only taken from
    /// `other` if this record has none.
    pub(crate) fn extend_with(&mut self, other: &PluginMetadata) {
        if self.group.is_none() {
            self.group = other.group.clone();
        }

        self.load_after = merge_vectors(std::mem::take(&mut self.load_after), &other.load_after);
        self.requirements = merge_vectors(std::mem::take(&mut self.requirements), &other.requirements);
        self.incompatibilities = merge_vectors(std::mem::take(&mut self.incompatibilities), &other.incompatibilities);
        self.messages = merge_vectors(std::mem::take(&mut self.messages), &other.messages);
        self.tags = merge_vectors(std::mem::take(&mut self.tags), &other.tags);
        self.dirty_info = merge_vectors(std::mem::take(&mut self.dirty_info), &other.dirty_info);
        self.clean_info = merge_vectors(std::mem::take(&mut self.clean_info), &other.clean_info);
        self.locations = merge_vectors(std::mem::take(&mut self.locations), &other.locations);
    }

    /// The subset written to a minimal list: name, tags and dirty info.
    pub fn minimal(&self) -> PluginMetadata {
        PluginMetadata {
            name: self.name.clone(),
            tags: self.tags.clone(),
            dirty_info: self.dirty_info.clone(),
            ..PluginMetadata::default()
        }
    }
}
