use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::install::InstalledPlugin;

/// Installation state shared between a game and its condition evaluator.
pub type SharedInstallState = Arc<RwLock<InstallState>>;

/// Data directory, installed plugins and active plugins of one game.
#[derive(Debug, Clone, Default)]
pub struct InstallState {
    data_path: PathBuf,
    /// Lowercased name -> plugin
    plugins: HashMap<String, InstalledPlugin>,
    /// Lowercased names of active plugins
    active: HashSet<String>,
}

impl InstallState {
    pub fn new(data_path: PathBuf) -> Self {
        Self {
            data_path,
            ..Self::default()
        }
    }

    /// Wraps the state for sharing.
    pub fn shared(self) -> SharedInstallState {
        Arc::new(RwLock::new(self))
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Replaces the installed plugin set.
    pub fn set_plugins(&mut self, plugins: Vec<InstalledPlugin>) {
        self.plugins = plugins
            .into_iter()
            .map(|p| (p.name.to_lowercase(), p))
            .collect();
    }

    pub fn add_plugin(&mut self, plugin: InstalledPlugin) {
        self.plugins.insert(plugin.name.to_lowercase(), plugin);
    }

    pub fn plugin(&self, name: &str) -> Option<&InstalledPlugin> {
        self.plugins.get(&name.to_lowercase())
    }

    pub fn plugins(&self) -> impl Iterator<Item = &InstalledPlugin> {
        self.plugins.values()
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Replaces the set of active plugins.
    pub fn set_active_plugins<S: AsRef<str>>(&mut self, names: &[S]) {
        self.active = names.iter().map(|n| n.as_ref().to_lowercase()).collect();
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains(&name.to_lowercase())
    }

    /// Names of the installed plugins that are active. Active names with no
    /// installed plugin are still reported, lowercased.
    pub fn active_plugins(&self) -> Vec<String> {
        self.active
            .iter()
            .map(|key| {
                self.plugins
                    .get(key)
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| key.clone())
            })
            .collect()
    }
}
