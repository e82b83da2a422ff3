//! Plugin Error Handling
//!
//! Error types for plugin discovery and loading. Outcomes that only mean "this
//! directory entry is not a plugin" (missing directory, no manifest, no `main`
//! field, missing main file) are never errors; everything in here aborts the
//! whole load call.

use crate::core::error_handling::ContextualError;
use crate::plugin::module::ModuleError;
use crate::plugin::registry::RegistryError;
use crate::plugin::types::CandidateReference;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for plugin operations
pub type PluginResult<T> = std::result::Result<T, PluginError>;

/// Error type returned by plugin factories and module loaders
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Which discovery source produced a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Global,
    Local,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Global => write!(f, "global"),
            SourceKind::Local => write!(f, "local"),
        }
    }
}

/// What went wrong while discovering candidates
#[derive(Debug, Error)]
pub enum DiscoveryDetail {
    #[error("package registry query failed: {0}")]
    Registry(#[from] RegistryError),

    #[error("cannot read plugin directory {}: {source}", .path.display())]
    ReadDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot read manifest {}: {source}", .path.display())]
    ReadManifest {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot inspect plugin entry {}: {source}", .path.display())]
    ReadEntry {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed manifest {}: {source}", .path.display())]
    ManifestParse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Why a resolved candidate could not be turned into a plugin
#[derive(Debug, Error)]
pub enum LoadCause {
    #[error("module could not be loaded: {0}")]
    Module(#[source] ModuleError),

    #[error("module does not expose a plugin factory")]
    MissingEntryPoint,

    #[error("plugin factory failed: {0}")]
    Factory(#[source] BoxError),

    #[error("plugin violates the capability contract: {0}")]
    InvalidContract(String),
}

/// Error types for plugin discovery and loading
#[derive(Debug, Error)]
pub enum PluginError {
    /// The registry query failed, or a local directory or manifest was unusable
    #[error("{origin} plugin discovery failed: {detail}")]
    Discovery {
        origin: SourceKind,
        #[source]
        detail: DiscoveryDetail,
    },

    /// A candidate was found but could not be instantiated
    #[error("failed to load plugin '{reference}': {cause}")]
    Load {
        reference: CandidateReference,
        #[source]
        cause: LoadCause,
    },

    /// The plugin name pattern is not a valid regular expression
    #[error("invalid plugin name pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

impl PluginError {
    pub(crate) fn global(detail: impl Into<DiscoveryDetail>) -> Self {
        PluginError::Discovery {
            origin: SourceKind::Global,
            detail: detail.into(),
        }
    }

    pub(crate) fn local(detail: impl Into<DiscoveryDetail>) -> Self {
        PluginError::Discovery {
            origin: SourceKind::Local,
            detail: detail.into(),
        }
    }

    pub(crate) fn load(reference: &CandidateReference, cause: LoadCause) -> Self {
        PluginError::Load {
            reference: reference.clone(),
            cause,
        }
    }

    /// Source that failed, for discovery errors
    pub fn origin(&self) -> Option<SourceKind> {
        match self {
            PluginError::Discovery { origin, .. } => Some(*origin),
            _ => None,
        }
    }

    /// Candidate that failed, for load errors
    pub fn reference(&self) -> Option<&CandidateReference> {
        match self {
            PluginError::Load { reference, .. } => Some(reference),
            _ => None,
        }
    }
}

impl ContextualError for PluginError {
    /// Everything except an interrupted or garbled registry query
    ///
    /// Registry failures that configuration can fix are shown to the user.
    fn is_user_actionable(&self) -> bool {
        !matches!(
            self,
            PluginError::Discovery {
                detail: DiscoveryDetail::Registry(
                    RegistryError::Cancelled | RegistryError::Malformed(_)
                ),
                ..
            }
        )
    }

    fn user_message(&self) -> Option<String> {
        if self.is_user_actionable() {
            Some(self.to_string())
        } else {
            None
        }
    }
}
