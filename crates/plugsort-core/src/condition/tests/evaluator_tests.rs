use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::{tempdir, TempDir};

use crate::condition::{ConditionError, ConditionEvaluator};
use crate::install::{InstallState, InstalledPlugin, SharedInstallState};
use crate::metadata::{File, PluginCleaningData, PluginMetadata, Tag};

fn setup_evaluator(plugins: Vec<InstalledPlugin>, active: &[&str]) -> (TempDir, SharedInstallState, ConditionEvaluator) {
    let dir = tempdir().expect("Failed to create temp directory");
    let mut state = InstallState::new(dir.path().to_path_buf());
    state.set_plugins(plugins);
    state.set_active_plugins(active);
    let state = state.shared();
    let evaluator = ConditionEvaluator::new(Arc::clone(&state));
    (dir, state, evaluator)
}

fn touch(dir: &Path, name: &str, content: &[u8]) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(path, content).expect("Failed to write test file");
}

#[test]
fn test_empty_condition_is_true_and_uncached() -> Result<(), ConditionError> {
    let (_dir, _state, evaluator) = setup_evaluator(Vec::new(), &[]);
    assert!(evaluator.evaluate("")?);
    assert!(evaluator.evaluate("   ")?);
    assert_eq!(evaluator.cached_condition_count(), 0);
    Ok(())
}

#[test]
fn test_file_condition() -> Result<(), ConditionError> {
    let (dir, _state, evaluator) = setup_evaluator(Vec::new(), &[]);
    touch(dir.path(), "Blank.esp", b"plugin");
    touch(dir.path(), "Hidden.esm.ghost", b"ghosted");
    touch(dir.path(), "textures/blank_01.dds", b"texture");

    assert!(evaluator.evaluate("file(\"Blank.esp\")")?);
    assert!(evaluator.evaluate("file(\"Hidden.esm\")")?);
    assert!(!evaluator.evaluate("file(\"Missing.esp\")")?);
    assert!(evaluator.evaluate("file(\"textures/blank_\\d+\\.dds\")")?);
    assert!(!evaluator.evaluate("file(\"meshes/.*\\.nif\")")?);
    Ok(())
}

#[test]
fn test_results_stay_cached_until_cleared() -> Result<(), ConditionError> {
    let (dir, _state, evaluator) = setup_evaluator(Vec::new(), &[]);
    let condition = "file(\"Late.esp\")";

    assert!(!evaluator.evaluate(condition)?);
    touch(dir.path(), "Late.esp", b"plugin");
    assert!(!evaluator.evaluate(condition)?, "Cached result should be returned");
    assert_eq!(evaluator.cached_condition_count(), 1);

    evaluator.clear_condition_cache();
    assert_eq!(evaluator.cached_condition_count(), 0);
    assert!(evaluator.evaluate(condition)?);
    Ok(())
}

#[test]
fn test_active_and_many_active() -> Result<(), ConditionError> {
    let plugins = vec![
        InstalledPlugin::new("Blank.esp"),
        InstalledPlugin::new("Blank - Different.esp"),
        InstalledPlugin::new("Other.esp"),
    ];
    let (_dir, _state, evaluator) = setup_evaluator(plugins, &["blank.esp", "Blank - Different.esp"]);

    assert!(evaluator.evaluate("active(\"Blank.esp\")")?);
    assert!(!evaluator.evaluate("active(\"Other.esp\")")?);
    assert!(evaluator.evaluate("active(\"Blank.*\\.esp\")")?);
    assert!(evaluator.evaluate("many_active(\"Blank.*\\.esp\")")?);
    assert!(!evaluator.evaluate("many_active(\"Other.*\\.esp\")")?);
    Ok(())
}

#[test]
fn test_many_counts_directory_entries() -> Result<(), ConditionError> {
    let (dir, _state, evaluator) = setup_evaluator(Vec::new(), &[]);
    touch(dir.path(), "Blank.esp", b"1");
    touch(dir.path(), "Blank - Different.esp.ghost", b"2");
    touch(dir.path(), "Single.esp", b"3");

    assert!(evaluator.evaluate("many(\"Blank.*\\.esp\")")?);
    assert!(!evaluator.evaluate("many(\"Single.*\\.esp\")")?);
    Ok(())
}

#[test]
fn test_is_master_and_readable() -> Result<(), ConditionError> {
    let plugins = vec![InstalledPlugin::master("Master.esm"), InstalledPlugin::new("Blank.esp")];
    let (dir, _state, evaluator) = setup_evaluator(plugins, &[]);
    touch(dir.path(), "Blank.esp", b"plugin");

    assert!(evaluator.evaluate("is_master(\"Master.esm\")")?);
    assert!(!evaluator.evaluate("is_master(\"Blank.esp\")")?);
    assert!(!evaluator.evaluate("is_master(\"Missing.esm\")")?);
    assert!(evaluator.evaluate("readable(\"Blank.esp\")")?);
    assert!(!evaluator.evaluate("readable(\"Missing.esp\")")?);
    Ok(())
}

#[test]
fn test_checksum_condition() -> Result<(), ConditionError> {
    let (dir, _state, evaluator) = setup_evaluator(Vec::new(), &[]);
    let content = b"checksum me";
    touch(dir.path(), "Blank.esp", content);
    let crc = crc32fast::hash(content);

    assert!(evaluator.evaluate(&format!("checksum(\"Blank.esp\", {:08X})", crc))?);
    assert!(!evaluator.evaluate(&format!("checksum(\"Blank.esp\", {:08X})", crc ^ 1))?);
    assert!(!evaluator.evaluate("checksum(\"Missing.esp\", 1234ABCD)")?);
    Ok(())
}

#[test]
fn test_version_condition() -> Result<(), ConditionError> {
    let plugins = vec![
        InstalledPlugin::new("Versioned.esp").with_version("1.2.0"),
        InstalledPlugin::new("Unversioned.esp"),
    ];
    let (dir, _state, evaluator) = setup_evaluator(plugins, &[]);
    touch(dir.path(), "Versioned.esp", b"v");
    touch(dir.path(), "Unversioned.esp", b"u");

    assert!(evaluator.evaluate("version(\"Versioned.esp\", \"1.0\", >)")?);
    assert!(evaluator.evaluate("version(\"Versioned.esp\", \"1.2\", ==)")?);
    assert!(!evaluator.evaluate("version(\"Versioned.esp\", \"2.0\", >=)")?);
    assert!(evaluator.evaluate("version(\"Unversioned.esp\", \"1.0\", <)")?);
    assert!(!evaluator.evaluate("version(\"Unversioned.esp\", \"1.0\", ==)")?);
    assert!(evaluator.evaluate("version(\"Missing.esp\", \"1.0\", !=)")?);
    Ok(())
}

#[test]
fn test_compound_conditions() -> Result<(), ConditionError> {
    let (dir, _state, evaluator) = setup_evaluator(Vec::new(), &[]);
    touch(dir.path(), "A.esp", b"a");

    assert!(evaluator.evaluate("file(\"A.esp\") and not file(\"B.esp\")")?);
    assert!(evaluator.evaluate("file(\"B.esp\") or file(\"A.esp\")")?);
    assert!(!evaluator.evaluate("not (file(\"A.esp\") or file(\"B.esp\"))")?);
    Ok(())
}

#[test]
fn test_syntax_errors_propagate() {
    let (_dir, _state, evaluator) = setup_evaluator(Vec::new(), &[]);
    let result = evaluator.evaluate("file(\"A.esp\" and");
    assert!(matches!(result, Err(ConditionError::Syntax { .. })));
    assert_eq!(evaluator.cached_condition_count(), 0);
}

#[test]
fn test_evaluate_all_filters_conditional_entries() -> Result<(), ConditionError> {
    let (dir, _state, evaluator) = setup_evaluator(Vec::new(), &[]);
    touch(dir.path(), "Present.esp", b"present");

    let mut metadata = PluginMetadata::new("Blank.esp");
    metadata.set_group("Late");
    metadata.load_after = vec![
        File::new("Always.esp"),
        File::with_condition("Sometimes.esp", "file(\"Present.esp\")"),
        File::with_condition("Never.esp", "file(\"Absent.esp\")"),
    ];
    metadata.tags = vec![
        Tag::addition("Relev").with_condition("file(\"Absent.esp\")"),
        Tag::addition("Delev"),
    ];

    let evaluated = evaluator.evaluate_all(&metadata)?;
    let names: Vec<&str> = evaluated.load_after.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["Always.esp", "Sometimes.esp"]);
    assert_eq!(evaluated.tags, vec![Tag::addition("Delev")]);
    assert_eq!(evaluated.group(), "Late");
    Ok(())
}

#[test]
fn test_evaluate_all_keeps_cleaning_data_for_matching_crc() -> Result<(), ConditionError> {
    let (dir, _state, evaluator) = setup_evaluator(Vec::new(), &[]);
    let content = b"dirty plugin";
    touch(dir.path(), "Dirty.esp", content);
    let crc = crc32fast::hash(content);

    let mut metadata = PluginMetadata::new("Dirty.esp");
    metadata.dirty_info = vec![
        PluginCleaningData::new(crc, "xEdit").with_counts(3, 0, 0),
        PluginCleaningData::new(crc.wrapping_add(1), "xEdit"),
    ];
    metadata.clean_info = vec![PluginCleaningData::new(crc.wrapping_add(2), "xEdit")];

    let evaluated = evaluator.evaluate_all(&metadata)?;
    assert_eq!(evaluated.dirty_info.len(), 1);
    assert_eq!(evaluated.dirty_info[0].crc, crc);
    assert!(evaluated.clean_info.is_empty());
    Ok(())
}

#[test]
fn test_scanner_crc_takes_precedence() -> Result<(), ConditionError> {
    let plugins = vec![InstalledPlugin::new("Scanned.esp").with_crc(0x0BADF00D)];
    let (_dir, _state, evaluator) = setup_evaluator(plugins, &[]);

    let mut metadata = PluginMetadata::new("Scanned.esp");
    metadata.dirty_info = vec![PluginCleaningData::new(0x0BADF00D, "xEdit")];

    let evaluated = evaluator.evaluate_all(&metadata)?;
    assert_eq!(evaluated.dirty_info.len(), 1);
    Ok(())
}

#[test]
fn test_state_changes_are_seen_after_clearing() -> Result<(), ConditionError> {
    let (_dir, state, evaluator) = setup_evaluator(vec![InstalledPlugin::new("A.esp")], &[]);
    assert!(!evaluator.evaluate("active(\"A.esp\")")?);

    state.write().expect("state lock").set_active_plugins(&["A.esp"]);
    assert!(!evaluator.evaluate("active(\"A.esp\")")?);

    evaluator.clear_condition_cache();
    assert!(evaluator.evaluate("active(\"A.esp\")")?);
    Ok(())
}
