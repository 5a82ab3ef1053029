#![cfg(test)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};

use crate::config::GameSettings;
use crate::install::InstalledPlugin;

pub const PRELUDE: &str = r#"
common:
  - &dirtyPlugin
    type: warn
    content: 'This plugin contains edits that should be cleaned.'
  - &patchAvailable
    type: say
    content: 'A compatibility patch is available for {0}.'
    subs: [ 'Blank.esp' ]
"#;

pub const MASTERLIST: &str = r#"
prelude:
  common:
    - &dirtyPlugin
      type: say
      content: 'Stale prelude text.'

bash_tags: [ Relev, Delev, Names ]

globals:
  - type: say
    content: 'Sorted by the test suite.'

groups:
  - name: default
  - name: Fixes
    after: [ default ]
  - name: Late
    after: [ Fixes ]

plugins:
  - name: Base.esm
    msg: [ *dirtyPlugin ]
  - name: Blank.esp
    tag: [ Relev ]
    req: [ Base.esm ]
  - name: 'Blank - Patch.*\.esp'
    group: Fixes
    after: [ Blank.esp ]
  - name: Late.esp
    group: Late
    msg:
      - type: warn
        content: 'Requires Blank.esp to be active.'
        condition: 'not active("Blank.esp")'
"#;

/// A game directory layout in a temp dir, with settings saved to disk.
pub struct TestInstall {
    pub dir: TempDir,
    pub settings_path: PathBuf,
}

impl TestInstall {
    pub fn data_path(&self) -> PathBuf {
        self.dir.path().join("Data")
    }
}

pub fn setup_install(userlist: Option<&str>) -> TestInstall {
    let dir = tempdir().expect("Failed to create temp directory");
    let root = dir.path();
    let data_path = root.join("Data");
    fs::create_dir_all(&data_path).expect("Failed to create data directory");

    write(root, "masterlist.yaml", MASTERLIST);
    write(root, "prelude.yaml", PRELUDE);
    if let Some(content) = userlist {
        write(root, "userlist.yaml", content);
    }

    for plugin in installed_plugins() {
        write(&data_path, &plugin.name, &plugin.name);
    }

    let settings = GameSettings::new("Integration", data_path, root.join("masterlist.yaml"))
        .with_prelude(root.join("prelude.yaml"))
        .with_userlist(root.join("userlist.yaml"))
        .with_master_file("Base.esm");
    let settings_path = root.join("settings.json");
    settings.save(&settings_path).expect("Failed to save settings");

    TestInstall { dir, settings_path }
}

pub fn installed_plugins() -> Vec<InstalledPlugin> {
    vec![
        InstalledPlugin::master("Base.esm"),
        InstalledPlugin::new("Late.esp").with_masters(&["Base.esm"]),
        InstalledPlugin::new("Blank - Patch A.esp").with_masters(&["Base.esm"]),
        InstalledPlugin::new("Blank.esp").with_masters(&["Base.esm"]).with_version("2.1"),
        InstalledPlugin::new("Unrelated.esp"),
    ]
}

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).expect("Failed to write test file");
}
