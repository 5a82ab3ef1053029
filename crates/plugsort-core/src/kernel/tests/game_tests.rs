use std::fs;

use tempfile::{tempdir, TempDir};

use crate::config::GameSettings;
use crate::install::InstalledPlugin;
use crate::kernel::error::{Error, Result};
use crate::kernel::Game;

const MASTERLIST: &str = r#"
groups:
  - name: default
  - name: Late
    after: [ default ]
plugins:
  - name: Late.esp
    group: Late
  - name: Patch.esp
    after:
      - name: Blank.esp
        condition: 'active("Blank.esp")'
"#;

fn setup_game(userlist: Option<&str>) -> (TempDir, Game) {
    let dir = tempdir().expect("Failed to create temp directory");
    let data_path = dir.path().join("Data");
    fs::create_dir_all(&data_path).expect("Failed to create data directory");

    let masterlist_path = dir.path().join("masterlist.yaml");
    fs::write(&masterlist_path, MASTERLIST).expect("Failed to write masterlist");

    let userlist_path = dir.path().join("userlist.yaml");
    if let Some(content) = userlist {
        fs::write(&userlist_path, content).expect("Failed to write userlist");
    }

    let settings = GameSettings::new("Test Game", data_path, masterlist_path)
        .with_userlist(userlist_path)
        .with_master_file("Game.esm");
    (dir, Game::new(settings))
}

fn install_plugins(game: &mut Game) {
    game.set_installed_plugins(vec![
        InstalledPlugin::master("Game.esm"),
        InstalledPlugin::new("Late.esp"),
        InstalledPlugin::new("Patch.esp"),
        InstalledPlugin::new("Blank.esp"),
    ]);
}

#[test]
fn test_new_game_has_empty_state() {
    let (_dir, game) = setup_game(None);
    assert_eq!(game.settings().name, "Test Game");
    assert!(game.load_order().is_empty());
    assert_eq!(game.install_state().read().expect("state lock").plugin_count(), 0);
}

#[test]
fn test_load_metadata_without_userlist() -> Result<()> {
    let (_dir, mut game) = setup_game(None);
    game.load_metadata()?;
    assert_eq!(game.database().groups(true).len(), 2);
    assert!(game.database().user_groups().is_empty());
    Ok(())
}

#[test]
fn test_load_metadata_missing_masterlist() {
    let dir = tempdir().expect("Failed to create temp directory");
    let settings = GameSettings::new("Test Game", dir.path().join("Data"), dir.path().join("missing.yaml"));
    let mut game = Game::new(settings);
    assert!(matches!(game.load_metadata(), Err(Error::FileAccess { .. })));
}

#[test]
fn test_sort_applies_groups_and_conditions() -> Result<()> {
    let (_dir, mut game) = setup_game(None);
    game.load_metadata()?;
    install_plugins(&mut game);
    game.set_load_order(vec![
        "Late.esp".to_string(),
        "Patch.esp".to_string(),
        "Blank.esp".to_string(),
        "Game.esm".to_string(),
    ]);

    // Blank.esp is inactive, so Patch.esp has no reason to load after it.
    let sorted = game.sort_plugins()?;
    assert_eq!(sorted, vec!["Game.esm", "Patch.esp", "Blank.esp", "Late.esp"]);
    assert_eq!(game.load_order()[0], "Late.esp", "Sorting must not change the stored load order");

    game.set_active_plugins(&["Blank.esp", "Patch.esp"]);
    let sorted = game.sort_plugins()?;
    assert_eq!(sorted, vec!["Game.esm", "Blank.esp", "Patch.esp", "Late.esp"]);
    Ok(())
}

#[test]
fn test_sort_uses_user_groups() -> Result<()> {
    let userlist = r#"
groups:
  - name: Early
plugins:
  - name: Late.esp
    group: default
  - name: Blank.esp
    group: Early
  - name: Patch.esp
    group: Late
"#;
    let (_dir, mut game) = setup_game(Some(userlist));
    game.load_metadata()?;
    install_plugins(&mut game);

    let sorted = game.sort_plugins()?;
    assert_eq!(sorted.first().map(String::as_str), Some("Game.esm"));
    assert_eq!(sorted.last().map(String::as_str), Some("Patch.esp"));
    Ok(())
}

#[test]
fn test_sort_reports_cycles() -> Result<()> {
    let userlist = r#"
plugins:
  - name: Blank.esp
    after: [ Late.esp ]
  - name: Late.esp
    after: [ Blank.esp ]
"#;
    let (_dir, mut game) = setup_game(Some(userlist));
    game.load_metadata()?;
    install_plugins(&mut game);

    let error = game.sort_plugins().expect_err("cycle should be detected");
    let cycle = error.cycle().expect("error should carry the cycle");
    assert_eq!(cycle.len(), 2);
    Ok(())
}

#[test]
fn test_sort_is_stable_across_games_and_resorts() -> Result<()> {
    let userlist = r#"
plugins:
  - name: p.esp
    group: Late
  - name: q.esp
    group: Late
  - name: x.esp
    after: [ p.esp ]
  - name: y.esp
    after: [ q.esp ]
"#;
    let expected = vec!["Game.esm", "p.esp", "x.esp", "q.esp", "y.esp"];

    for _ in 0..20 {
        let (_dir, mut game) = setup_game(Some(userlist));
        game.load_metadata()?;
        game.set_installed_plugins(vec![
            InstalledPlugin::new("y.esp"),
            InstalledPlugin::new("q.esp"),
            InstalledPlugin::master("Game.esm"),
            InstalledPlugin::new("x.esp"),
            InstalledPlugin::new("p.esp"),
        ]);

        let first = game.sort_plugins()?;
        assert_eq!(first, expected);

        game.set_load_order(first.clone());
        assert_eq!(game.sort_plugins()?, first);
    }
    Ok(())
}
