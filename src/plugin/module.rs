//! Module Loading
//!
//! Turning a candidate reference into something that can build a plugin is
//! delegated to a [`ModuleLoader`]. The bundled [`StaticModuleLoader`] is a
//! registration table: modules are registered at runtime with
//! [`StaticModuleLoader::register`], or at link time with the
//! [`plugin_module!`](crate::plugin_module) macro.

use crate::plugin::error::BoxError;
use crate::plugin::traits::Plugin;
use crate::plugin::types::CandidateReference;
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Zero-argument factory producing one plugin instance
pub type PluginFactory = fn() -> Result<Box<dyn Plugin>, BoxError>;

/// Errors reported by module loaders
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("no module registered for '{0}'")]
    NotRegistered(String),

    #[error("module failed to initialise: {0}")]
    Failed(#[source] BoxError),
}

/// A loaded module, exposing its plugin factory if it has one
#[derive(Clone)]
pub struct PluginModule {
    name: String,
    entry_point: Option<PluginFactory>,
}

impl PluginModule {
    pub fn new(name: impl Into<String>, factory: PluginFactory) -> Self {
        Self {
            name: name.into(),
            entry_point: Some(factory),
        }
    }

    /// A module that loaded fine but exports no factory
    pub fn without_entry_point(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entry_point: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry_point(&self) -> Option<PluginFactory> {
        self.entry_point
    }
}

impl fmt::Debug for PluginModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginModule")
            .field("name", &self.name)
            .field("has_entry_point", &self.entry_point.is_some())
            .finish()
    }
}

/// Resolves candidate references to loaded modules
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    async fn load_module(&self, reference: &CandidateReference)
        -> Result<PluginModule, ModuleError>;
}

/// Link-time module registration collected by `inventory`
pub struct ModuleRegistration {
    pub name: &'static str,
    pub factory: PluginFactory,
}

inventory::collect!(ModuleRegistration);

/// Register a plugin module under a name at link time
///
/// The name is matched against the reference key first and the module name
/// (package or directory entry name) second.
///
/// ```rust,ignore
/// plugseek::plugin_module!("test-plugin", || Ok(Box::new(TestPlugin::default())));
/// ```
#[macro_export]
macro_rules! plugin_module {
    ($name:expr, $factory:expr) => {
        $crate::__private::inventory::submit! {
            $crate::plugin::api::ModuleRegistration {
                name: $name,
                factory: $factory,
            }
        }
    };
}

/// Module loader backed by a table of registered factories
#[derive(Clone, Default)]
pub struct StaticModuleLoader {
    modules: HashMap<String, PluginFactory>,
}

impl StaticModuleLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader seeded with every module registered through `plugin_module!`
    pub fn with_registered_modules() -> Self {
        let mut loader = Self::new();
        for registration in inventory::iter::<ModuleRegistration>() {
            log::trace!("Found registered plugin module '{}'", registration.name);
            loader.register(registration.name, registration.factory);
        }
        loader
    }

    /// Register a factory under a reference key or a module name
    pub fn register(&mut self, name: impl Into<String>, factory: PluginFactory) -> &mut Self {
        self.modules.insert(name.into(), factory);
        self
    }

    pub fn with_module(mut self, name: impl Into<String>, factory: PluginFactory) -> Self {
        self.register(name, factory);
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    fn lookup(&self, reference: &CandidateReference) -> Option<(&str, PluginFactory)> {
        [reference.key(), reference.module_name()]
            .into_iter()
            .find_map(|name| {
                self.modules
                    .get_key_value(name)
                    .map(|(name, factory)| (name.as_str(), *factory))
            })
    }
}

impl fmt::Debug for StaticModuleLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.modules.keys().collect();
        names.sort();
        f.debug_struct("StaticModuleLoader")
            .field("modules", &names)
            .finish()
    }
}

#[async_trait]
impl ModuleLoader for StaticModuleLoader {
    async fn load_module(
        &self,
        reference: &CandidateReference,
    ) -> Result<PluginModule, ModuleError> {
        let (name, factory) = self
            .lookup(reference)
            .ok_or_else(|| ModuleError::NotRegistered(reference.key().to_string()))?;
        log::debug!("Resolved '{}' to module '{}'", reference, name);
        Ok(PluginModule::new(name, factory))
    }
}
