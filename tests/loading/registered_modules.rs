//! Plugins registered with `plugin_module!` and loaded from a local directory

use crate::common::*;
use plugseek::plugin::api::{
    LoaderConfig, LoadCause, PluginError, PluginId, PluginLoader, StaticModuleLoader,
    StaticRegistry,
};
use std::sync::Arc;
use tempfile::TempDir;

plugseek::plugin_module!("test-plugin", test_plugin_factory);

const PATTERN: &str = r"^test-[\w-]*$";

fn local_loader(config: &LoaderConfig) -> PluginLoader {
    PluginLoader::new(
        config,
        Arc::new(StaticRegistry::empty()),
        Arc::new(StaticModuleLoader::with_registered_modules()),
    )
    .unwrap()
}

#[tokio::test]
async fn test_single_local_plugin_end_to_end() {
    let root = TempDir::new().unwrap();
    write_plugin_package(root.path(), "test-plugin");
    let config = LoaderConfig::new(PATTERN)
        .without_global()
        .with_local_directory(root.path());

    let plugins = local_loader(&config).load_plugins().await.unwrap();

    assert_eq!(plugins.len(), 1);
    let plugin = plugins
        .get(PluginId::parse_str(TEST_PLUGIN_ID).unwrap())
        .unwrap();
    assert_eq!(plugin.display_name(), "Test-Plugin");
    assert_eq!(plugin.description(), "This is a very simple test plugin");
}

#[tokio::test]
async fn test_non_matching_and_incomplete_entries_are_skipped() {
    let root = TempDir::new().unwrap();
    write_plugin_package(root.path(), "test-plugin");
    write_plugin_package(root.path(), "unrelated-package");
    std::fs::create_dir_all(root.path().join("test-empty")).unwrap();
    std::fs::write(root.path().join("test-file"), "{}").unwrap();
    let config = LoaderConfig::new(PATTERN)
        .without_global()
        .with_local_directory(root.path());

    let loader = local_loader(&config);
    let candidates = loader.discover_candidates().await.unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates.iter().next().unwrap().module_name(), "test-plugin");
}

#[tokio::test]
async fn test_unregistered_plugin_aborts_loading() {
    let root = TempDir::new().unwrap();
    write_plugin_package(root.path(), "test-plugin");
    write_plugin_package(root.path(), "test-unknown");
    let config = LoaderConfig::new(PATTERN)
        .without_global()
        .with_local_directory(root.path());

    let error = local_loader(&config).load_plugins().await.unwrap_err();

    match error {
        PluginError::Load {
            reference,
            cause: LoadCause::Module(_),
        } => assert_eq!(reference.module_name(), "test-unknown"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_repeated_loads_yield_the_same_plugins() {
    let first_dir = TempDir::new().unwrap();
    let second_dir = TempDir::new().unwrap();
    write_plugin_package(first_dir.path(), "test-plugin");
    write_plugin_package(second_dir.path(), "test-plugin");
    let config = LoaderConfig::new(PATTERN)
        .without_global()
        .with_local_directory(first_dir.path())
        .with_local_directory(second_dir.path());
    let loader = local_loader(&config);

    let first = loader.load_plugins().await.unwrap();
    let second = loader.load_plugins().await.unwrap();

    // one instance per directory, both with the same identity
    assert_eq!(first.len(), 2);
    assert_eq!(first.ids(), second.ids());
    assert_eq!(first.ids().len(), 1);
}
