use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError, RwLockReadGuard};

use crate::condition::error::ConditionError;
use crate::condition::parser::{parse_condition, Expression, Function, PathSpec};
use crate::condition::version::Version;
use crate::install::{InstallState, SharedInstallState};
use crate::kernel::constants::{is_plugin_file_name, GHOST_FILE_EXTENSION};
use crate::metadata::{Conditional, PluginCleaningData, PluginMetadata};

/// Evaluates condition strings against the installation and memoizes the results.
///
/// One evaluator belongs to one game and is shared by `Arc` between the game,
/// its database and any caller needing raw evaluation. Results stay cached
/// until [`clear_condition_cache`](Self::clear_condition_cache) is called, even
/// if the installation changes in between.
#[derive(Debug)]
pub struct ConditionEvaluator {
    state: SharedInstallState,
    /// Condition string -> result
    condition_cache: Mutex<HashMap<String, bool>>,
    /// Lowercased relative path -> CRC32
    crc_cache: Mutex<HashMap<String, u32>>,
}

impl ConditionEvaluator {
    pub fn new(state: SharedInstallState) -> Self {
        Self {
            state,
            condition_cache: Mutex::new(HashMap::new()),
            crc_cache: Mutex::new(HashMap::new()),
        }
    }

    /// The installation state this evaluator reads.
    pub fn install_state(&self) -> &SharedInstallState {
        &self.state
    }

    /// Evaluates a condition. An empty condition is true.
    pub fn evaluate(&self, condition: &str) -> Result<bool, ConditionError> {
        if condition.trim().is_empty() {
            return Ok(true);
        }

        if let Some(&cached) = self.lock_condition_cache().get(condition) {
            return Ok(cached);
        }

        let expression = parse_condition(condition)?;
        let result = {
            let state = self.read_state();
            self.evaluate_expression(&expression, &state, condition)?
        };

        log::trace!("Condition \"{}\" evaluated to {}", condition, result);
        self.lock_condition_cache().insert(condition.to_string(), result);

        Ok(result)
    }

    /// Discards cached condition results and file checksums.
    pub fn clear_condition_cache(&self) {
        self.lock_condition_cache().clear();
        self.crc_cache.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Number of memoized condition results.
    pub fn cached_condition_count(&self) -> usize {
        self.lock_condition_cache().len()
    }

    /// Returns a copy of `metadata` keeping only the entries that apply to
    /// the current installation.
    ///
    /// Conditional entries are kept when their condition is true. Dirty and
    /// clean records are kept when their CRC matches the plugin file's.
    pub fn evaluate_all(&self, metadata: &PluginMetadata) -> Result<PluginMetadata, ConditionError> {
        let mut evaluated = PluginMetadata {
            name: metadata.name.clone(),
            group: metadata.group.clone(),
            locations: metadata.locations.clone(),
            ..PluginMetadata::default()
        };

        evaluated.load_after = self.filter(&metadata.load_after)?;
        evaluated.requirements = self.filter(&metadata.requirements)?;
        evaluated.incompatibilities = self.filter(&metadata.incompatibilities)?;
        evaluated.messages = self.filter(&metadata.messages)?;
        evaluated.tags = self.filter(&metadata.tags)?;

        if !metadata.dirty_info.is_empty() || !metadata.clean_info.is_empty() {
            let crc = self.plugin_crc(&metadata.name)?;
            evaluated.dirty_info = filter_by_crc(&metadata.dirty_info, crc);
            evaluated.clean_info = filter_by_crc(&metadata.clean_info, crc);
        }

        Ok(evaluated)
    }

    /// Keeps the entries whose condition is absent or true, in order.
    pub fn filter<T: Conditional + Clone>(&self, entries: &[T]) -> Result<Vec<T>, ConditionError> {
        let mut kept = Vec::with_capacity(entries.len());
        for entry in entries {
            let applies = match entry.condition() {
                Some(condition) => self.evaluate(condition)?,
                None => true,
            };
            if applies {
                kept.push(entry.clone());
            }
        }
        Ok(kept)
    }

    fn read_state(&self) -> RwLockReadGuard<'_, InstallState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_condition_cache(&self) -> std::sync::MutexGuard<'_, HashMap<String, bool>> {
        self.condition_cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn evaluate_expression(
        &self,
        expression: &Expression,
        state: &InstallState,
        condition: &str,
    ) -> Result<bool, ConditionError> {
        match expression {
            Expression::Function(function) => self.evaluate_function(function, state, condition),
            Expression::Not(inner) => Ok(!self.evaluate_expression(inner, state, condition)?),
            Expression::And(left, right) => Ok(self.evaluate_expression(left, state, condition)?
                && self.evaluate_expression(right, state, condition)?),
            Expression::Or(left, right) => Ok(self.evaluate_expression(left, state, condition)?
                || self.evaluate_expression(right, state, condition)?),
        }
    }

    fn evaluate_function(
        &self,
        function: &Function,
        state: &InstallState,
        condition: &str,
    ) -> Result<bool, ConditionError> {
        let data_path = state.data_path();
        match function {
            Function::File(spec) if spec.is_regex() => {
                Ok(count_directory_matches(data_path, spec, condition)? > 0)
            }
            Function::File(spec) => Ok(resolve_existing(data_path, &spec.path()).is_some()),
            Function::Readable(path) => {
                let full = data_path.join(path);
                Ok(if full.is_dir() {
                    fs::read_dir(&full).is_ok()
                } else {
                    fs::File::open(&full).is_ok()
                })
            }
            Function::Active(spec) if spec.is_regex() => {
                Ok(state.active_plugins().iter().any(|name| spec.matches(name)))
            }
            Function::Active(spec) => Ok(state.is_active(&spec.file_name)),
            Function::Many(spec) => Ok(count_directory_matches(data_path, spec, condition)? > 1),
            Function::ManyActive(spec) => {
                Ok(state.active_plugins().iter().filter(|name| spec.matches(name)).count() > 1)
            }
            Function::IsMaster(name) => Ok(state.plugin(name).is_some_and(|p| p.is_master)),
            Function::Checksum(path, expected) => {
                Ok(self.file_crc(state, path, condition)? == Some(*expected))
            }
            Function::Version(path, given, comparator) => {
                let actual = installed_version(state, path);
                Ok(comparator.evaluate(actual.as_ref(), given))
            }
        }
    }

    /// CRC32 of the plugin file named `plugin_name`.
    fn plugin_crc(&self, plugin_name: &str) -> Result<Option<u32>, ConditionError> {
        let state = self.read_state();
        let condition = format!("checksum(\"{}\")", plugin_name);
        self.file_crc(&state, Path::new(plugin_name), &condition)
    }

    /// CRC32 of a file relative to the data directory. Scanner-supplied CRCs
    /// of installed plugins are used as-is; other files are hashed once and
    /// cached.
    fn file_crc(&self, state: &InstallState, path: &Path, condition: &str) -> Result<Option<u32>, ConditionError> {
        let key = path.to_string_lossy().to_lowercase();

        if let Some(crc) = state.plugin(&key).and_then(|p| p.crc) {
            return Ok(Some(crc));
        }

        if let Some(&crc) = self.crc_cache.lock().unwrap_or_else(PoisonError::into_inner).get(&key) {
            return Ok(Some(crc));
        }

        let Some(full_path) = resolve_existing(state.data_path(), path) else {
            return Ok(None);
        };
        if full_path.is_dir() {
            return Ok(None);
        }

        let crc = compute_crc(&full_path).map_err(|source| ConditionError::Io {
            condition: condition.to_string(),
            path: full_path.clone(),
            source,
        })?;
        log::debug!("Computed CRC {:08X} for '{}'", crc, full_path.display());

        self.crc_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key, crc);

        Ok(Some(crc))
    }
}

fn filter_by_crc(records: &[PluginCleaningData], crc: Option<u32>) -> Vec<PluginCleaningData> {
    match crc {
        Some(crc) => records.iter().filter(|r| r.crc == crc).cloned().collect(),
        None => Vec::new(),
    }
}

/// Resolves `path` under the data directory, also accepting a ghosted plugin.
fn resolve_existing(data_path: &Path, path: &Path) -> Option<PathBuf> {
    let full = data_path.join(path);
    if full.exists() {
        return Some(full);
    }

    let file_name = path.file_name()?.to_string_lossy();
    if is_plugin_file_name(&file_name) {
        let ghosted = full.with_file_name(format!("{}{}", file_name, GHOST_FILE_EXTENSION));
        if ghosted.exists() {
            return Some(ghosted);
        }
    }
    None
}

/// Counts the entries of the path's parent directory whose names match the path. Ghosted
/// plugins are matched by their unghosted name. A missing directory has no
/// matches.
fn count_directory_matches(data_path: &Path, spec: &PathSpec, condition: &str) -> Result<usize, ConditionError> {
    let directory = data_path.join(&spec.parent);
    let entries = match fs::read_dir(&directory) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(source) => {
            return Err(ConditionError::Io {
                condition: condition.to_string(),
                path: directory,
                source,
            });
        }
    };

    let mut count = 0;
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if spec.matches(unghosted_name(&name)) {
            count += 1;
        }
    }
    Ok(count)
}

/// Strips a `.ghost` suffix from a plugin file name.
fn unghosted_name(name: &str) -> &str {
    let Some(split) = name.len().checked_sub(GHOST_FILE_EXTENSION.len()) else {
        return name;
    };
    match (name.get(..split), name.get(split..)) {
        (Some(stem), Some(suffix)) if suffix.eq_ignore_ascii_case(GHOST_FILE_EXTENSION) && is_plugin_file_name(stem) => stem,
        _ => name,
    }
}

/// Version of a file, as far as the engine can know it: only installed
/// plugins that exist on disk carry one.
fn installed_version(state: &InstallState, path: &Path) -> Option<Version> {
    resolve_existing(state.data_path(), path)?;
    let name = path.to_string_lossy();
    state
        .plugin(&name)
        .and_then(|p| p.version.as_deref())
        .map(Version::parse)
}

fn compute_crc(path: &Path) -> io::Result<u32> {
    let mut file = fs::File::open(path)?;
    let mut hasher = crc32fast::Hasher::new();
    let mut buffer = [0u8; 8192];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(hasher.finalize())
}
