//! Relative plugin directories resolve against the working directory

use crate::common::*;
use plugseek::plugin::api::{LoaderConfig, PluginLoader, StaticModuleLoader, StaticRegistry};
use serial_test::serial;
use std::sync::Arc;
use tempfile::TempDir;

struct RestoreDir(std::path::PathBuf);

impl Drop for RestoreDir {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.0);
    }
}

#[tokio::test]
#[serial]
async fn test_relative_directory_yields_absolute_reference() {
    let root = TempDir::new().unwrap();
    let root_path = std::fs::canonicalize(root.path()).unwrap();
    write_plugin_package(&root_path.join("plugins"), "test-plugin");
    let _restore = RestoreDir(std::env::current_dir().unwrap());
    std::env::set_current_dir(&root_path).unwrap();

    let config = LoaderConfig::new(r"^test-[\w-]*$")
        .without_global()
        .with_local_directory("./plugins/../plugins");
    let loader = PluginLoader::new(
        &config,
        Arc::new(StaticRegistry::empty()),
        Arc::new(StaticModuleLoader::new()),
    )
    .unwrap();

    let candidates = loader.discover_candidates().await.unwrap();

    let reference = candidates.iter().next().unwrap();
    assert!(reference.path().is_absolute());
    assert_eq!(
        reference.path(),
        root_path.join("plugins").join("test-plugin").join("index.js")
    );
}
