//! Tests running the compiled binary

use crate::common::write_plugin_package;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn plugseek(config_dir: &Path, args: &[&str]) -> Output {
    // an explicit, empty configuration file keeps the user's own settings out
    let config_file = config_dir.join("plugseek.toml");
    if !config_file.exists() {
        std::fs::write(&config_file, "").unwrap();
    }
    Command::new(env!("CARGO_BIN_EXE_plugseek"))
        .arg("--config-file")
        .arg(&config_file)
        .arg("--no-color")
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_discover_lists_local_candidates_as_json() {
    let dir = TempDir::new().unwrap();
    let plugins = dir.path().join("plugins");
    let package_dir = write_plugin_package(&plugins, "test-plugin");

    let output = plugseek(
        dir.path(),
        &[
            "--no-global",
            "--pattern",
            r"^test-[\w-]*$",
            "--plugin-dir",
            plugins.to_str().unwrap(),
            "discover",
            "--json",
        ],
    );

    assert!(output.status.success(), "{:?}", output);
    let listing: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let entries = listing.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0]["key"],
        package_dir.join("index.js").to_string_lossy().as_ref()
    );
}

#[test]
fn test_empty_discovery_succeeds() {
    let dir = TempDir::new().unwrap();

    let output = plugseek(
        dir.path(),
        &["--no-global", "--plugin-dir", dir.path().join("none").to_str().unwrap()],
    );

    assert!(output.status.success(), "{:?}", output);
    assert!(output.stdout.is_empty());
}

#[test]
fn test_load_failure_exits_with_one() {
    let dir = TempDir::new().unwrap();
    let plugins = dir.path().join("plugins");
    write_plugin_package(&plugins, "test-unregistered");

    let output = plugseek(
        dir.path(),
        &[
            "--no-global",
            "--pattern",
            r"^test-[\w-]*$",
            "--plugin-dir",
            plugins.to_str().unwrap(),
            "load",
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("test-unregistered"));
}

#[test]
fn test_missing_package_manager_is_named_in_the_error() {
    let dir = TempDir::new().unwrap();

    let output = plugseek(
        dir.path(),
        &[
            "--registry-program",
            "plugseek-no-such-package-manager",
            "--plugin-dir",
            dir.path().join("none").to_str().unwrap(),
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("plugseek-no-such-package-manager"), "{}", stderr);
    assert!(stderr.contains("global plugin discovery failed"), "{}", stderr);
}

#[test]
fn test_invalid_pattern_exits_with_two() {
    let dir = TempDir::new().unwrap();

    let output = plugseek(dir.path(), &["--no-global", "--pattern", "(unclosed"]);

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_missing_config_file_exits_with_two() {
    let dir = TempDir::new().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_plugseek"))
        .arg("--config-file")
        .arg(dir.path().join("missing.toml"))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}
