use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::kernel::constants::PRELUDE_KEY;
use crate::metadata::error::MetadataError;
use crate::metadata::{Group, Message, PluginMetadata};

/// Serialized layout of a masterlist or userlist.
#[derive(Debug, Default, Serialize, Deserialize)]
struct MetadataDocument {
    /// Only used as an anchor source; never read or written back.
    #[serde(default, skip_serializing)]
    prelude: Option<serde_yaml::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    bash_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    globals: Vec<Message>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    groups: Vec<Group>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    plugins: Vec<PluginMetadata>,
}

/// A regex plugin entry together with its compiled pattern.
#[derive(Debug, Clone)]
struct RegexEntry {
    regex: Regex,
    metadata: PluginMetadata,
}

/// One parsed masterlist or userlist.
#[derive(Debug, Clone, Default)]
pub struct MetadataList {
    /// Exact-name entries in declaration order
    plugins: Vec<PluginMetadata>,
    /// Lowercased name -> position in `plugins`
    plugin_index: HashMap<String, usize>,
    regex_plugins: Vec<RegexEntry>,
    groups: Vec<Group>,
    bash_tags: Vec<String>,
    messages: Vec<Message>,
}

impl MetadataList {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and parses the file at `path`.
    pub fn load(path: &Path) -> Result<Self, MetadataError> {
        let content = read_file(path)?;
        Self::from_yaml_str(&content, &path.display().to_string())
    }

    /// Reads the masterlist at `path`, splicing in the prelude file before parsing.
    pub fn load_with_prelude(path: &Path, prelude_path: &Path) -> Result<Self, MetadataError> {
        let content = read_file(path)?;
        let prelude = read_file(prelude_path)?;
        let spliced = replace_prelude(&content, &prelude);
        Self::from_yaml_str(&spliced, &path.display().to_string())
    }

    /// Parses metadata from YAML text. `origin` names the source in error messages.
    pub fn from_yaml_str(content: &str, origin: &str) -> Result<Self, MetadataError> {
        let document: MetadataDocument = if content.trim().is_empty() {
            MetadataDocument::default()
        } else {
            serde_yaml::from_str(content).map_err(|source| MetadataError::Syntax {
                origin: origin.to_string(),
                source,
            })?
        };

        let mut list = MetadataList {
            bash_tags: document.bash_tags,
            messages: document.globals,
            ..MetadataList::default()
        };

        for group in document.groups {
            if list.groups.iter().any(|g| g.name == group.name) {
                return Err(MetadataError::DuplicateGroup(group.name));
            }
            list.groups.push(group);
        }

        for plugin in document.plugins {
            list.add_plugin(plugin)?;
        }

        log::debug!(
            "Parsed metadata from '{}': {} plugin entries, {} regex entries, {} groups",
            origin,
            list.plugins.len(),
            list.regex_plugins.len(),
            list.groups.len()
        );

        Ok(list)
    }

    /// Serializes the list to YAML text.
    pub fn to_yaml_string(&self) -> Result<String, MetadataError> {
        let document = MetadataDocument {
            prelude: None,
            bash_tags: self.bash_tags.clone(),
            globals: self.messages.clone(),
            groups: self.groups.clone(),
            plugins: self.plugins(),
        };
        serde_yaml::to_string(&document).map_err(MetadataError::Serialization)
    }

    /// Writes the list to `path`, atomically replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<(), MetadataError> {
        let yaml = self.to_yaml_string()?;
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp_file = NamedTempFile::new_in(parent)
            .map_err(|e| MetadataError::io(e, "create_temp_file", parent.to_path_buf()))?;
        temp_file
            .write_all(yaml.as_bytes())
            .map_err(|e| MetadataError::io(e, "write_to_temp_file", temp_file.path().to_path_buf()))?;
        temp_file
            .persist(path)
            .map_err(|e| MetadataError::io(e.error, "persist_temp_file", path.to_path_buf()))?;

        Ok(())
    }

    /// All plugin entries: exact entries first, then regex entries, each in
    /// declaration order.
    pub fn plugins(&self) -> Vec<PluginMetadata> {
        self.plugins
            .iter()
            .cloned()
            .chain(self.regex_plugins.iter().map(|entry| entry.metadata.clone()))
            .collect()
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    pub fn bash_tags(&self) -> &[String] {
        &self.bash_tags
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn set_groups(&mut self, groups: Vec<Group>) {
        self.groups = groups;
    }

    pub fn set_bash_tags(&mut self, bash_tags: Vec<String>) {
        self.bash_tags = bash_tags;
    }

    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    /// Looks up the metadata that applies to `plugin_name`.
    ///
    /// The exact entry (matched case-insensitively) comes first, then every
    /// regex entry matching the name is appended to it. Returns `None` when
    /// neither kind of entry matched.
    pub fn find_plugin(&self, plugin_name: &str) -> Option<PluginMetadata> {
        let exact = self
            .plugin_index
            .get(&plugin_name.to_lowercase())
            .map(|&i| self.plugins[i].clone());

        let mut matched = exact.is_some();
        let mut metadata = exact.unwrap_or_else(|| PluginMetadata::new(plugin_name));

        for entry in self.regex_plugins.iter().filter(|e| e.regex.is_match(plugin_name)) {
            metadata.extend_with(&entry.metadata);
            matched = true;
        }

        matched.then_some(metadata)
    }

    /// Adds a plugin entry. Fails if an entry with the same name exists.
    pub fn add_plugin(&mut self, plugin: PluginMetadata) -> Result<(), MetadataError> {
        if plugin.is_regex_plugin() {
            if self.regex_plugins.iter().any(|e| e.metadata.name == plugin.name) {
                return Err(MetadataError::DuplicatePlugin(plugin.name));
            }
            let regex = RegexBuilder::new(&format!("^(?:{})$", plugin.name))
                .case_insensitive(true)
                .build()
                .map_err(|source| MetadataError::InvalidRegex {
                    name: plugin.name.clone(),
                    source,
                })?;
            self.regex_plugins.push(RegexEntry { regex, metadata: plugin });
            return Ok(());
        }

        let key = plugin.name.to_lowercase();
        if self.plugin_index.contains_key(&key) {
            return Err(MetadataError::DuplicatePlugin(plugin.name));
        }
        self.plugin_index.insert(key, self.plugins.len());
        self.plugins.push(plugin);
        Ok(())
    }

    /// Removes the entry with the given name, if any. Regex entries are only
    /// removed by their exact pattern text.
    pub fn erase_plugin(&mut self, plugin_name: &str) {
        let key = plugin_name.to_lowercase();
        if let Some(position) = self.plugin_index.remove(&key) {
            self.plugins.remove(position);
            self.reindex();
        }
        self.regex_plugins.retain(|e| e.metadata.name != plugin_name);
    }

    /// Removes all plugins, groups, Bash Tags and messages.
    pub fn clear(&mut self) {
        *self = MetadataList::default();
    }

    fn reindex(&mut self) {
        self.plugin_index = self
            .plugins
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name.to_lowercase(), i))
            .collect();
    }
}

fn read_file(path: &Path) -> Result<String, MetadataError> {
    fs::read_to_string(path).map_err(|e| MetadataError::io(e, "read_to_string", path.to_path_buf()))
}

/// Replaces the block under the masterlist's top-level `prelude:` key with the
/// prelude text, indented under the key. Content without a prelude key is
/// returned unchanged.
pub(crate) fn replace_prelude(masterlist: &str, prelude: &str) -> String {
    let lines: Vec<&str> = masterlist.lines().collect();
    let Some(start) = lines.iter().position(|line| line.starts_with(PRELUDE_KEY)) else {
        return masterlist.to_string();
    };

    // The block ends at the next line that starts a new top-level key.
    let end = lines[start + 1..]
        .iter()
        .position(|line| {
            !line.is_empty() && !line.starts_with(char::is_whitespace) && !line.starts_with('#')
        })
        .map(|offset| start + 1 + offset)
        .unwrap_or(lines.len());

    let mut output = String::with_capacity(masterlist.len() + prelude.len());
    for line in &lines[..start] {
        output.push_str(line);
        output.push('\n');
    }
    output.push_str(PRELUDE_KEY);
    output.push('\n');
    for line in prelude.lines() {
        if !line.is_empty() {
            output.push_str("  ");
            output.push_str(line);
        }
        output.push('\n');
    }
    for line in &lines[end..] {
        output.push_str(line);
        output.push('\n');
    }
    output
}
