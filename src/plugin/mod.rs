//! Plugin System Module
//!
//! Discovers plugin packages in the global package registry and in local
//! plugin directories, then loads and instantiates them behind the
//! [`Plugin`](api::Plugin) capability contract.

// Internal modules - all access should go through api module
pub(crate) mod error;
pub(crate) mod global;
pub(crate) mod loader;
pub(crate) mod local;
pub(crate) mod manifest;
pub(crate) mod matcher;
pub(crate) mod module;
pub(crate) mod registry;
pub(crate) mod traits;
pub(crate) mod types;

// Public API module - the only public interface for the plugin system
pub mod api;
