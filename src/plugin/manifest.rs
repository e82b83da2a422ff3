//! Package manifest parsing
//!
//! Only the `main` field matters for resolution; every other field is kept
//! as raw JSON and used for diagnostics at most.

use crate::core::paths::normalize_path;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// File name of the manifest inside a plugin package directory
pub const MANIFEST_FILE: &str = "package.json";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PluginManifest {
    /// Entry file, relative to the package directory
    #[serde(default)]
    pub main: Option<String>,

    #[serde(flatten)]
    pub other: serde_json::Map<String, serde_json::Value>,
}

impl PluginManifest {
    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Declared package name, if it is a string
    pub fn name(&self) -> Option<&str> {
        self.other.get("name").and_then(|v| v.as_str())
    }

    /// Declared entry file; an empty `main` counts as absent
    pub fn entry_point(&self) -> Option<&str> {
        self.main.as_deref().filter(|main| !main.trim().is_empty())
    }

    /// Entry file joined with the package directory and normalized
    pub fn resolve_entry(&self, package_dir: &Path) -> Option<PathBuf> {
        self.entry_point()
            .map(|main| normalize_path(&package_dir.join(main)))
    }
}
