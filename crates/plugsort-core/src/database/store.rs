use std::path::Path;
use std::sync::Arc;

use crate::condition::ConditionEvaluator;
use crate::kernel::error::{Error, Result};
use crate::metadata::{Group, Message, MetadataList, PluginMetadata};
use crate::sorting::{groups_path, GroupGraph, Vertex};

/// The masterlist and userlist of one game, and the queries over them.
///
/// Both lists are replaced wholesale on load. Queries that evaluate
/// conditions go through the shared [`ConditionEvaluator`].
#[derive(Debug)]
pub struct Database {
    evaluator: Arc<ConditionEvaluator>,
    masterlist: MetadataList,
    userlist: MetadataList,
}

impl Database {
    pub fn new(evaluator: Arc<ConditionEvaluator>) -> Self {
        Self {
            evaluator,
            masterlist: MetadataList::new(),
            userlist: MetadataList::new(),
        }
    }

    pub fn evaluator(&self) -> &Arc<ConditionEvaluator> {
        &self.evaluator
    }

    pub fn masterlist(&self) -> &MetadataList {
        &self.masterlist
    }

    pub fn userlist(&self) -> &MetadataList {
        &self.userlist
    }

    // --- Loading and writing ---

    pub fn load_masterlist(&mut self, path: &Path) -> Result<()> {
        require_existing(path, "masterlist")?;
        self.masterlist = MetadataList::load(path)?;
        log::info!("Loaded masterlist from {}", path.display());
        Ok(())
    }

    /// Loads the masterlist after splicing the prelude into its `prelude` key.
    pub fn load_masterlist_with_prelude(&mut self, path: &Path, prelude_path: &Path) -> Result<()> {
        require_existing(path, "masterlist")?;
        require_existing(prelude_path, "masterlist prelude")?;
        self.masterlist = MetadataList::load_with_prelude(path, prelude_path)?;
        log::info!(
            "Loaded masterlist from {} with prelude {}",
            path.display(),
            prelude_path.display()
        );
        Ok(())
    }

    pub fn load_userlist(&mut self, path: &Path) -> Result<()> {
        require_existing(path, "userlist")?;
        self.userlist = MetadataList::load(path)?;
        log::info!("Loaded userlist from {}", path.display());
        Ok(())
    }

    /// Writes the userlist to `path`.
    pub fn write_user_metadata(&self, path: &Path, overwrite: bool) -> Result<()> {
        check_write_target(path, overwrite)?;
        self.userlist.save(path)?;
        log::info!("Wrote user metadata to {}", path.display());
        Ok(())
    }

    /// Writes the masterlist entries that carry Bash Tag suggestions or dirty
    /// info, reduced to their name, tags and dirty info.
    pub fn write_minimal_list(&self, path: &Path, overwrite: bool) -> Result<()> {
        check_write_target(path, overwrite)?;

        let mut minimal = MetadataList::new();
        for plugin in self.masterlist.plugins() {
            if plugin.tags.is_empty() && plugin.dirty_info.is_empty() {
                continue;
            }
            minimal.add_plugin(plugin.minimal())?;
        }

        minimal.save(path)?;
        log::info!("Wrote minimal list to {}", path.display());
        Ok(())
    }

    // --- Conditions ---

    pub fn evaluate(&self, condition: &str) -> Result<bool> {
        Ok(self.evaluator.evaluate(condition)?)
    }

    // --- Whole-list queries ---

    /// Bash Tags declared by the masterlist, then by the userlist.
    pub fn known_bash_tags(&self) -> Vec<String> {
        self.masterlist
            .bash_tags()
            .iter()
            .chain(self.userlist.bash_tags())
            .cloned()
            .collect()
    }

    /// Global messages of the masterlist, then of the userlist. When
    /// evaluating, the condition cache is cleared first and messages whose
    /// condition is false are dropped.
    pub fn general_messages(&self, evaluate_conditions: bool) -> Result<Vec<Message>> {
        let messages: Vec<Message> = self
            .masterlist
            .messages()
            .iter()
            .chain(self.userlist.messages())
            .cloned()
            .collect();

        if !evaluate_conditions {
            return Ok(messages);
        }

        self.evaluator.clear_condition_cache();
        Ok(self.evaluator.filter(&messages)?)
    }

    /// Masterlist groups, merged with userlist groups if requested.
    pub fn groups(&self, include_user_metadata: bool) -> Vec<Group> {
        if include_user_metadata {
            merge_groups(self.masterlist.groups(), self.userlist.groups())
        } else {
            self.masterlist.groups().to_vec()
        }
    }

    pub fn user_groups(&self) -> Vec<Group> {
        self.userlist.groups().to_vec()
    }

    pub fn set_user_groups(&mut self, groups: Vec<Group>) {
        self.userlist.set_groups(groups);
    }

    /// Shortest load-order path between two groups, over masterlist and
    /// userlist groups.
    pub fn groups_path(&self, from: &str, to: &str) -> Result<Vec<Vertex>> {
        let graph = GroupGraph::build(self.masterlist.groups(), self.userlist.groups())?;
        Ok(groups_path(&graph, from, to)?)
    }

    // --- Per-plugin queries ---

    /// Metadata for one plugin: the masterlist record, with the userlist record
    /// merged over it if requested, optionally condition-filtered. `None` when
    /// neither list has an entry that applies.
    pub fn plugin_metadata(
        &self,
        plugin_name: &str,
        include_user_metadata: bool,
        evaluate_conditions: bool,
    ) -> Result<Option<PluginMetadata>> {
        let mut metadata = self.masterlist.find_plugin(plugin_name);

        if include_user_metadata {
            if let Some(mut user) = self.userlist.find_plugin(plugin_name) {
                if let Some(master) = &metadata {
                    user.merge_metadata(master);
                }
                metadata = Some(user);
            }
        }

        self.evaluate_if(metadata, evaluate_conditions)
    }

    /// The userlist record for one plugin, optionally condition-filtered.
    pub fn plugin_user_metadata(&self, plugin_name: &str, evaluate_conditions: bool) -> Result<Option<PluginMetadata>> {
        let metadata = self.userlist.find_plugin(plugin_name);
        self.evaluate_if(metadata, evaluate_conditions)
    }

    /// Replaces the userlist record with the same name.
    pub fn set_plugin_user_metadata(&mut self, metadata: PluginMetadata) -> Result<()> {
        self.userlist.erase_plugin(&metadata.name);
        self.userlist.add_plugin(metadata)?;
        Ok(())
    }

    pub fn discard_plugin_user_metadata(&mut self, plugin_name: &str) {
        self.userlist.erase_plugin(plugin_name);
    }

    /// Clears the userlist: plugins, groups, Bash Tags and messages.
    pub fn discard_all_user_metadata(&mut self) {
        self.userlist.clear();
    }

    fn evaluate_if(&self, metadata: Option<PluginMetadata>, evaluate_conditions: bool) -> Result<Option<PluginMetadata>> {
        match metadata {
            Some(metadata) if evaluate_conditions => Ok(Some(self.evaluator.evaluate_all(&metadata)?)),
            other => Ok(other),
        }
    }
}

/// Merges userlist groups into masterlist groups.
///
/// A user group with a new name is appended after every masterlist group, in
/// the order first seen. A user group with an existing name replaces the
/// description if its own is non-empty, and appends its after-list as is.
pub fn merge_groups(masterlist_groups: &[Group], user_groups: &[Group]) -> Vec<Group> {
    let mut merged = masterlist_groups.to_vec();
    let mut new_groups: Vec<Group> = Vec::new();

    for user_group in user_groups {
        match merged.iter_mut().find(|g| g.name == user_group.name) {
            Some(existing) => {
                if !user_group.description.is_empty() {
                    existing.description = user_group.description.clone();
                }
                existing.after_groups.extend(user_group.after_groups.iter().cloned());
            }
            None => match new_groups.iter_mut().find(|g| g.name == user_group.name) {
                Some(queued) => {
                    if !user_group.description.is_empty() {
                        queued.description = user_group.description.clone();
                    }
                    queued.after_groups.extend(user_group.after_groups.iter().cloned());
                }
                None => new_groups.push(user_group.clone()),
            },
        }
    }

    merged.extend(new_groups);
    merged
}

fn require_existing(path: &Path, what: &str) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::file_access(path, format!("The given {} path does not exist", what)))
    }
}

fn check_write_target(path: &Path, overwrite: bool) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !parent.exists() {
        return Err(Error::file_access(path, "The output directory does not exist"));
    }
    if path.exists() && !overwrite {
        return Err(Error::file_access(
            path,
            "Output file exists but overwrite is not set to true",
        ));
    }
    Ok(())
}
