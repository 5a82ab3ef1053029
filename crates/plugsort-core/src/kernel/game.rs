use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLockWriteGuard};

use crate::condition::ConditionEvaluator;
use crate::config::GameSettings;
use crate::database::Database;
use crate::install::{InstallState, InstalledPlugin, SharedInstallState};
use crate::kernel::error::Result;
use crate::sorting::{sort_plugins_with_main_master, GroupGraph, PluginSortingData};

/// One game's engine instance.
///
/// Owns the settings, the installation state, the condition evaluator shared
/// with its [`Database`], and the current load order.
#[derive(Debug)]
pub struct Game {
    settings: GameSettings,
    state: SharedInstallState,
    evaluator: Arc<ConditionEvaluator>,
    database: Database,
    load_order: Vec<String>,
}

impl Game {
    pub fn new(settings: GameSettings) -> Self {
        let state = InstallState::new(settings.data_path.clone()).shared();
        let evaluator = Arc::new(ConditionEvaluator::new(Arc::clone(&state)));
        let database = Database::new(Arc::clone(&evaluator));

        log::debug!(
            "Created game '{}' with data path {}",
            settings.name,
            settings.data_path.display()
        );

        Self {
            settings,
            state,
            evaluator,
            database,
            load_order: Vec::new(),
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn database_mut(&mut self) -> &mut Database {
        &mut self.database
    }

    pub fn evaluator(&self) -> &Arc<ConditionEvaluator> {
        &self.evaluator
    }

    pub fn install_state(&self) -> &SharedInstallState {
        &self.state
    }

    /// Loads the masterlist (with the prelude, if configured) and the
    /// userlist, if configured and present.
    pub fn load_metadata(&mut self) -> Result<()> {
        let masterlist_path = self.settings.masterlist_path.clone();
        match self.settings.prelude_path.clone() {
            Some(prelude_path) if prelude_path.exists() => {
                self.database.load_masterlist_with_prelude(&masterlist_path, &prelude_path)?
            }
            _ => self.database.load_masterlist(&masterlist_path)?,
        }

        if let Some(userlist_path) = self.settings.userlist_path.clone() {
            if userlist_path.exists() {
                self.database.load_userlist(&userlist_path)?;
            } else {
                log::debug!("No userlist found at {}", userlist_path.display());
            }
        }

        Ok(())
    }

    /// Replaces the installed plugins with what the scanner found.
    pub fn set_installed_plugins(&mut self, plugins: Vec<InstalledPlugin>) {
        let count = plugins.len();
        self.write_state().set_plugins(plugins);
        log::debug!("Game '{}' now has {} installed plugins", self.settings.name, count);
    }

    pub fn set_active_plugins<S: AsRef<str>>(&mut self, names: &[S]) {
        self.write_state().set_active_plugins(names);
    }

    pub fn set_load_order(&mut self, load_order: Vec<String>) {
        self.load_order = load_order;
    }

    pub fn load_order(&self) -> &[String] {
        &self.load_order
    }

    /// Computes a new load order for the installed plugins.
    ///
    /// The condition cache is cleared first so the sort sees the current
    /// installation. The stored load order is left unchanged; callers apply
    /// the result with [`set_load_order`](Self::set_load_order).
    pub fn sort_plugins(&self) -> Result<Vec<String>> {
        self.evaluator.clear_condition_cache();

        let positions: HashMap<String, usize> = self
            .load_order
            .iter()
            .enumerate()
            .map(|(i, name)| (name.to_lowercase(), i))
            .collect();

        let installed: Vec<InstalledPlugin> = {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            state.plugins().cloned().collect()
        };

        let mut sorting_data = Vec::with_capacity(installed.len());
        for plugin in &installed {
            let masterlist = self.database.plugin_metadata(&plugin.name, false, true)?;
            let user = self.database.plugin_user_metadata(&plugin.name, true)?;
            sorting_data.push(PluginSortingData::new(
                plugin,
                masterlist.as_ref(),
                user.as_ref(),
                positions.get(&plugin.name.to_lowercase()).copied(),
            ));
        }

        let groups = GroupGraph::build(&self.database.groups(false), &self.database.user_groups())?;
        let sorted = sort_plugins_with_main_master(sorting_data, &groups, self.settings.master_file.as_deref())?;

        log::info!("Sorted {} plugins for '{}'", sorted.len(), self.settings.name);
        Ok(sorted)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, InstallState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
