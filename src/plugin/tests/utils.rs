//! Plugin Test Utilities
//!
//! Factories, registries and module loaders shared by the loader tests.

use crate::plugin::error::BoxError;
use crate::plugin::manifest::MANIFEST_FILE;
use crate::plugin::module::{ModuleError, ModuleLoader, PluginModule};
use crate::plugin::registry::{InstalledPackages, PackageRegistry, RegistryError};
use crate::plugin::traits::{Plugin, PluginDescriptor};
use crate::plugin::types::{CandidateReference, PluginId};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const TEST_PLUGIN_ID: &str = "eec72bee-b232-11ee-a506-0242ac120002";
pub const SECOND_PLUGIN_ID: &str = "4f1c3e0a-3c1d-4b8e-9a57-0d2f7c6b1e42";

pub fn test_plugin_factory() -> Result<Box<dyn Plugin>, BoxError> {
    Ok(Box::new(PluginDescriptor::new(
        PluginId::parse_str(TEST_PLUGIN_ID)?,
        "Test-Plugin",
        "This is a very simple test plugin",
    )))
}

pub fn second_plugin_factory() -> Result<Box<dyn Plugin>, BoxError> {
    Ok(Box::new(PluginDescriptor::new(
        PluginId::parse_str(SECOND_PLUGIN_ID)?,
        "Second-Plugin",
        "Another test plugin",
    )))
}

pub fn failing_factory() -> Result<Box<dyn Plugin>, BoxError> {
    Err("plugin could not open its configuration".into())
}

pub fn panicking_factory() -> Result<Box<dyn Plugin>, BoxError> {
    panic!("plugin constructor blew up")
}

pub fn nil_id_factory() -> Result<Box<dyn Plugin>, BoxError> {
    Ok(Box::new(PluginDescriptor::new(
        PluginId::nil(),
        "Nameless",
        "Has no identity",
    )))
}

pub fn blank_description_factory() -> Result<Box<dyn Plugin>, BoxError> {
    Ok(Box::new(PluginDescriptor::new(
        PluginId::parse_str(SECOND_PLUGIN_ID)?,
        "Quiet-Plugin",
        "   ",
    )))
}

/// Registry that is never reachable
pub struct UnreachableRegistry;

#[async_trait]
impl PackageRegistry for UnreachableRegistry {
    async fn list_installed_packages(&self) -> Result<InstalledPackages, RegistryError> {
        Err(RegistryError::Spawn {
            program: "npm".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "npm: command not found"),
        })
    }
}

/// Registry whose query never finishes in test time
pub struct StalledRegistry;

#[async_trait]
impl PackageRegistry for StalledRegistry {
    async fn list_installed_packages(&self) -> Result<InstalledPackages, RegistryError> {
        tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
        Ok(InstalledPackages::default())
    }
}

/// Module loader whose modules never export a factory
#[derive(Default)]
pub struct FactorylessModuleLoader {
    pub calls: AtomicUsize,
}

#[async_trait]
impl ModuleLoader for FactorylessModuleLoader {
    async fn load_module(
        &self,
        reference: &CandidateReference,
    ) -> Result<PluginModule, ModuleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(PluginModule::without_entry_point(reference.module_name()))
    }
}

/// Create `<root>/<name>` with a manifest whose `main` is `index.js`
pub fn write_plugin_package(root: &Path, name: &str) -> PathBuf {
    let package_dir = root.join(name);
    fs::create_dir_all(&package_dir).unwrap();
    fs::write(package_dir.join(MANIFEST_FILE), r#"{"main": "index.js"}"#).unwrap();
    fs::write(package_dir.join("index.js"), "module.exports = {}").unwrap();
    package_dir
}
