#![cfg(test)]

use std::fs;

use crate::config::GameSettings;
use crate::kernel::error::Result;
use crate::kernel::Game;
use crate::metadata::MessageType;

use super::common::{installed_plugins, setup_install};

fn loaded_game(userlist: Option<&str>) -> Result<(super::common::TestInstall, Game)> {
    let install = setup_install(userlist);
    let settings = GameSettings::load(&install.settings_path)?;
    let mut game = Game::new(settings);
    game.load_metadata()?;
    game.set_installed_plugins(installed_plugins());
    Ok((install, game))
}

#[test]
fn test_prelude_anchors_reach_masterlist_entries() -> Result<()> {
    let (_install, game) = loaded_game(None)?;

    let base = game
        .database()
        .plugin_metadata("Base.esm", true, true)?
        .expect("Base.esm entry");
    assert_eq!(base.messages.len(), 1);
    assert_eq!(base.messages[0].message_type, MessageType::Warn);
    assert_eq!(
        base.messages[0].content[0].text,
        "This plugin contains edits that should be cleaned."
    );
    Ok(())
}

#[test]
fn test_regex_entry_applies_to_matching_plugin() -> Result<()> {
    let (_install, game) = loaded_game(None)?;

    let patch = game
        .database()
        .plugin_metadata("Blank - Patch A.esp", true, true)?
        .expect("regex entry should match");
    assert_eq!(patch.group(), "Fixes");
    assert_eq!(patch.load_after.len(), 1);
    Ok(())
}

#[test]
fn test_full_sort() -> Result<()> {
    let (_install, mut game) = loaded_game(None)?;
    game.set_active_plugins(&["Base.esm", "Blank.esp"]);
    game.set_load_order(vec![
        "Late.esp".to_string(),
        "Blank - Patch A.esp".to_string(),
        "Unrelated.esp".to_string(),
        "Blank.esp".to_string(),
        "Base.esm".to_string(),
    ]);

    let sorted = game.sort_plugins()?;
    assert_eq!(
        sorted,
        vec!["Base.esm", "Unrelated.esp", "Blank.esp", "Blank - Patch A.esp", "Late.esp"]
    );

    // Feeding the result back in changes nothing.
    game.set_load_order(sorted.clone());
    assert_eq!(game.sort_plugins()?, sorted);
    Ok(())
}

#[test]
fn test_conditional_messages_follow_active_state() -> Result<()> {
    let (_install, mut game) = loaded_game(None)?;

    let late = game.database().plugin_metadata("Late.esp", true, true)?.expect("Late.esp entry");
    assert_eq!(late.messages.len(), 1, "Blank.esp is inactive");

    game.set_active_plugins(&["Blank.esp"]);
    let stale = game.database().plugin_metadata("Late.esp", true, true)?.expect("Late.esp entry");
    assert_eq!(stale.messages.len(), 1, "Cached result until the cache is cleared");

    game.evaluator().clear_condition_cache();
    let fresh = game.database().plugin_metadata("Late.esp", true, true)?.expect("Late.esp entry");
    assert!(fresh.messages.is_empty());
    Ok(())
}

#[test]
fn test_user_edits_round_trip_through_userlist() -> Result<()> {
    let userlist = r#"
groups:
  - name: Fixes
    after: [ Late ]
  - name: Late
    description: 'User override'
"#;
    let (install, mut game) = loaded_game(Some(userlist))?;

    // The user's group edit creates a cycle with the masterlist's.
    let error = game.sort_plugins().expect_err("group cycle should fail the sort");
    assert!(error.cycle().is_some());

    game.database_mut().discard_all_user_metadata();
    let output = install.dir.path().join("userlist.out.yaml");
    game.database().write_user_metadata(&output, false)?;
    assert!(fs::read_to_string(&output).expect("written userlist").trim().len() <= 2);

    assert!(game.sort_plugins().is_ok());
    Ok(())
}

#[test]
fn test_minimal_list_from_masterlist() -> Result<()> {
    let (install, game) = loaded_game(None)?;
    let output = install.dir.path().join("minimal.yaml");
    game.database().write_minimal_list(&output, true)?;

    let written = fs::read_to_string(&output).expect("written minimal list");
    assert!(written.contains("Blank.esp"));
    assert!(written.contains("Relev"));
    assert!(!written.contains("Late.esp"));
    assert!(!written.contains("groups"));
    Ok(())
}
