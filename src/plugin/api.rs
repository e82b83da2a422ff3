//! Public API for the plugin system
//!
//! External modules should import from here rather than directly from
//! internal modules.

// Loading
pub use crate::plugin::loader::{union_candidates, validate_contract, LoaderConfig, PluginLoader};

// Discovery sources
pub use crate::plugin::global::GlobalSource;
pub use crate::plugin::local::LocalSource;
pub use crate::plugin::manifest::{PluginManifest, MANIFEST_FILE};
pub use crate::plugin::matcher::NameMatcher;

// Installed package registries
pub use crate::plugin::registry::{
    default_registry_env, InstalledPackages, NpmRegistry, PackageRegistry, RegistryConfig,
    RegistryError, StaticRegistry,
};

// Module loading
pub use crate::plugin::module::{
    ModuleError, ModuleLoader, ModuleRegistration, PluginFactory, PluginModule,
    StaticModuleLoader,
};

// Plugin contract and types
pub use crate::plugin::traits::{Plugin, PluginDescriptor};
pub use crate::plugin::types::{
    CandidateReference, CandidateSet, PluginId, PluginSet, ReferenceKind, SourceLocation,
};

// Error handling
pub use crate::plugin::error::{
    BoxError, DiscoveryDetail, LoadCause, PluginError, PluginResult, SourceKind,
};
