//! CLI TOML configuration tests
//!
//! Configuration files on disk combined with command line overrides.

use clap::Parser;
use plugseek::app::cli::args::Args;
use plugseek::app::cli::config::{load_config_file, resolve_loader_config, ConfigError};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

const CONFIG: &str = r#"
pattern = "^test-[\\w-]*$"
plugin-dir = ["/opt/plugins", "/srv/plugins"]
global = false
registry-program = "pnpm"
registry-timeout = 12
log-level = "info"

[registry-env]
npm_config_prefix = "/opt/npm"
"#;

#[tokio::test]
async fn test_config_file_drives_loader_configuration() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plugseek.toml");
    std::fs::write(&path, CONFIG).unwrap();

    let file = load_config_file(Some(&path)).await.unwrap().unwrap();
    let args = Args::try_parse_from(["plugseek"]).unwrap();
    let config = resolve_loader_config(&args, &file, None).unwrap();

    assert_eq!(config.name_pattern, r"^test-[\w-]*$");
    assert_eq!(
        config.local_directories,
        vec![PathBuf::from("/opt/plugins"), PathBuf::from("/srv/plugins")]
    );
    assert!(!config.global);
    assert_eq!(config.registry.program, "pnpm");
    assert_eq!(config.registry.timeout, Duration::from_secs(12));
    assert_eq!(config.registry.env["npm_config_prefix"], "/opt/npm");
    assert_eq!(config.registry.env["npm_config_loglevel"], "silent");
}

#[tokio::test]
async fn test_command_line_plugin_dirs_replace_file_dirs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plugseek.toml");
    std::fs::write(&path, CONFIG).unwrap();

    let file = load_config_file(Some(&path)).await.unwrap().unwrap();
    let args = Args::try_parse_from(["plugseek", "--plugin-dir", "/cli/plugins"]).unwrap();
    let config = resolve_loader_config(&args, &file, None).unwrap();

    assert_eq!(config.local_directories, vec![PathBuf::from("/cli/plugins")]);
}

#[tokio::test]
async fn test_wrong_value_type_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("plugseek.toml");
    std::fs::write(&path, "global = \"yes\"\n").unwrap();

    let error = load_config_file(Some(&path)).await.unwrap_err();

    assert!(matches!(error, ConfigError::Parse { .. }));
}
