//! Tests for layered settings loading

use std::path::PathBuf;

use tempfile::TempDir;

use orgtree::config::{local_config_path, Settings, LOCAL_CONFIG_FILE};
use orgtree::domain::DuplicateIdPolicy;
use orgtree::util::testing::init_test_setup;

fn write_config(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("write config");
    path
}

#[test]
fn given_global_only_when_loading_then_global_values_apply() {
    init_test_setup();
    // Arrange
    let temp = TempDir::new().unwrap();
    let global = write_config(
        &temp,
        "global.toml",
        r#"
[roster]
require_header = false

[output]
show_tree = false
"#,
    );

    // Act
    let settings = Settings::load_from(Some(&global), None).unwrap();

    // Assert
    assert!(!settings.roster.require_header);
    assert!(settings.roster.skip_malformed_rows);
    assert!(!settings.output.show_tree);
}

#[test]
fn given_global_and_local_when_loading_then_local_wins_per_key() {
    init_test_setup();
    // Arrange
    let temp = TempDir::new().unwrap();
    let global = write_config(
        &temp,
        "global.toml",
        r#"
[roster]
skip_malformed_rows = false

[tree]
duplicate_ids = "reject"
"#,
    );
    let local = write_config(
        &temp,
        LOCAL_CONFIG_FILE,
        r#"
[tree]
duplicate_ids = "last_write_wins"
"#,
    );

    // Act
    let settings = Settings::load_from(Some(&global), Some(&local)).unwrap();

    // Assert
    assert_eq!(settings.tree.duplicate_ids, DuplicateIdPolicy::LastWriteWins);
    assert!(!settings.roster.skip_malformed_rows);
}

#[test]
fn given_invalid_toml_when_loading_then_config_error() {
    init_test_setup();
    let temp = TempDir::new().unwrap();
    let local = write_config(&temp, LOCAL_CONFIG_FILE, "[tree\nduplicate_ids = 1");

    let err = Settings::load_from(None, Some(&local)).unwrap_err();

    assert!(err.to_string().starts_with("config error: parse"));
}

#[test]
fn given_unknown_policy_when_loading_then_config_error() {
    init_test_setup();
    let temp = TempDir::new().unwrap();
    let local = write_config(
        &temp,
        LOCAL_CONFIG_FILE,
        "[tree]\nduplicate_ids = \"first_wins\"\n",
    );

    assert!(Settings::load_from(None, Some(&local)).is_err());
}

#[test]
fn given_directory_when_resolving_local_path_then_joins_file_name() {
    init_test_setup();
    let path = local_config_path(std::path::Path::new("/tmp/project"));
    assert_eq!(path, PathBuf::from("/tmp/project/.orgtree.toml"));
}

#[test]
fn given_template_when_loading_as_local_then_matches_defaults() {
    init_test_setup();
    let temp = TempDir::new().unwrap();
    let local = write_config(&temp, LOCAL_CONFIG_FILE, &Settings::template());

    let settings = Settings::load_from(None, Some(&local)).unwrap();

    assert_eq!(settings, Settings::default());
}
