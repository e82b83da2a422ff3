//! Plugin Loader
//!
//! Aggregates the global and local sources into one deduplicated candidate
//! set, then loads and instantiates every candidate. Loading is fail-fast: the
//! first candidate that cannot be turned into a valid plugin aborts the call
//! and no partial set is returned.

use crate::plugin::error::{LoadCause, PluginError, PluginResult};
use crate::plugin::global::GlobalSource;
use crate::plugin::local::LocalSource;
use crate::plugin::matcher::NameMatcher;
use crate::plugin::module::ModuleLoader;
use crate::plugin::registry::{NpmRegistry, PackageRegistry, RegistryConfig};
use crate::plugin::traits::Plugin;
use crate::plugin::types::{CandidateReference, CandidateSet, PluginSet, SourceLocation};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Construction-time loader configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Regular expression package and directory names must match
    pub name_pattern: String,
    /// Local directories to scan, in order
    pub local_directories: Vec<PathBuf>,
    /// Whether the global package registry is queried
    pub global: bool,
    /// How the global registry is queried
    pub registry: RegistryConfig,
}

impl LoaderConfig {
    pub fn new(name_pattern: impl Into<String>) -> Self {
        Self {
            name_pattern: name_pattern.into(),
            local_directories: Vec::new(),
            global: true,
            registry: RegistryConfig::default(),
        }
    }

    pub fn with_local_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.local_directories.push(directory.into());
        self
    }

    pub fn without_global(mut self) -> Self {
        self.global = false;
        self
    }

    pub fn with_registry(mut self, registry: RegistryConfig) -> Self {
        self.registry = registry;
        self
    }

    /// Locations described by this configuration
    pub fn source_locations(&self) -> Vec<SourceLocation> {
        let global = self.global.then_some(SourceLocation::Global);
        global
            .into_iter()
            .chain(
                self.local_directories
                    .iter()
                    .cloned()
                    .map(SourceLocation::LocalDirectory),
            )
            .collect()
    }
}

/// Discovers and instantiates plugins
///
/// Configuration is fixed at construction; every call performs a fresh
/// registry query and directory walk, so one loader can serve concurrent
/// callers.
pub struct PluginLoader {
    global: Option<GlobalSource>,
    local: LocalSource,
    local_directories: Vec<PathBuf>,
    modules: Arc<dyn ModuleLoader>,
}

impl PluginLoader {
    /// Build a loader; fails if the name pattern does not compile
    pub fn new(
        config: &LoaderConfig,
        registry: Arc<dyn PackageRegistry>,
        modules: Arc<dyn ModuleLoader>,
    ) -> PluginResult<Self> {
        let matcher = NameMatcher::new(&config.name_pattern)?;
        let global = config.global.then(|| {
            GlobalSource::new(matcher.clone(), registry, config.registry.timeout)
        });

        Ok(Self {
            global,
            local: LocalSource::new(matcher),
            local_directories: config.local_directories.clone(),
            modules,
        })
    }

    /// Build a loader that queries the npm CLI for global packages
    pub fn with_npm_registry(
        config: &LoaderConfig,
        modules: Arc<dyn ModuleLoader>,
    ) -> PluginResult<Self> {
        let registry = Arc::new(NpmRegistry::new(config.registry.clone()));
        Self::new(config, registry, modules)
    }

    /// Locations this loader searches, global first
    pub fn source_locations(&self) -> Vec<SourceLocation> {
        let global = self.global.as_ref().map(|_| SourceLocation::Global);
        global
            .into_iter()
            .chain(
                self.local_directories
                    .iter()
                    .cloned()
                    .map(SourceLocation::LocalDirectory),
            )
            .collect()
    }

    /// Union of global and local candidates, deduplicated by normalized reference
    pub async fn discover_candidates(&self) -> PluginResult<CandidateSet> {
        self.discover_candidates_until(&CancellationToken::new())
            .await
    }

    /// Like [`discover_candidates`](Self::discover_candidates) with a caller
    /// supplied cancellation token for the registry query
    pub async fn discover_candidates_until(
        &self,
        cancel: &CancellationToken,
    ) -> PluginResult<CandidateSet> {
        let global = async {
            match &self.global {
                Some(source) => source.list_global_candidates_until(cancel).await,
                None => Ok(CandidateSet::new()),
            }
        };
        let local = self.local.list_local_candidates(&self.local_directories);

        let (global, local) = tokio::try_join!(global, local)?;
        log::info!(
            "Discovered {} global and {} local plugin candidates",
            global.len(),
            local.len()
        );
        Ok(union_candidates(global, local))
    }

    /// Discover, load and instantiate every plugin
    pub async fn load_plugins(&self) -> PluginResult<PluginSet> {
        self.load_plugins_with_cancel(&CancellationToken::new())
            .await
    }

    /// Like [`load_plugins`](Self::load_plugins); the registry query is
    /// abandoned when `cancel` fires
    pub async fn load_plugins_with_cancel(
        &self,
        cancel: &CancellationToken,
    ) -> PluginResult<PluginSet> {
        let candidates = self.discover_candidates_until(cancel).await?;

        let mut plugins = PluginSet::new();
        for reference in &candidates {
            plugins.push(self.instantiate(reference).await?);
        }

        log::info!("Loaded {} plugins", plugins.len());
        Ok(plugins)
    }

    async fn instantiate(&self, reference: &CandidateReference) -> PluginResult<Box<dyn Plugin>> {
        let module = self
            .modules
            .load_module(reference)
            .await
            .map_err(|e| PluginError::load(reference, LoadCause::Module(e)))?;

        let factory = module
            .entry_point()
            .ok_or_else(|| PluginError::load(reference, LoadCause::MissingEntryPoint))?;

        let plugin = match catch_unwind(AssertUnwindSafe(factory)) {
            Ok(Ok(plugin)) => plugin,
            Ok(Err(e)) => return Err(PluginError::load(reference, LoadCause::Factory(e))),
            Err(panic) => {
                let message = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                return Err(PluginError::load(
                    reference,
                    LoadCause::Factory(format!("factory panicked: {}", message).into()),
                ));
            }
        };

        validate_contract(plugin.as_ref())
            .map_err(|reason| PluginError::load(reference, LoadCause::InvalidContract(reason)))?;

        log::debug!(
            "Instantiated plugin '{}' ({}) from {}",
            plugin.display_name(),
            plugin.plugin_id(),
            reference
        );
        Ok(plugin)
    }
}

/// Union two candidate sets; equal normalized references collapse to one
pub fn union_candidates(global: CandidateSet, local: CandidateSet) -> CandidateSet {
    let mut union = global;
    union.extend(local);
    union
}

/// Structural check of the capability contract
pub fn validate_contract(plugin: &dyn Plugin) -> Result<(), String> {
    if plugin.plugin_id().is_nil() {
        return Err("plugin id is the nil UUID".to_string());
    }
    if plugin.display_name().trim().is_empty() {
        return Err("display name is empty".to_string());
    }
    if plugin.description().trim().is_empty() {
        return Err("description is empty".to_string());
    }
    Ok(())
}
