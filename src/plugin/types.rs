//! Type definitions for the plugin system
//!
//! Search locations, resolved candidate references, plugin identities and the
//! plugin set handed back to callers.

use crate::core::paths::normalize_path;
use crate::plugin::traits::Plugin;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Where plugins are looked up
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceLocation {
    /// The globally installed package registry, queried as a whole
    Global,
    /// A local directory whose entries are plugin package directories
    LocalDirectory(PathBuf),
}

/// How a candidate reference was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReferenceKind {
    /// Globally installed package
    Package,
    /// Package found in a local plugin directory
    EntryFile,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Package => write!(f, "package"),
            ReferenceKind::EntryFile => write!(f, "entry-file"),
        }
    }
}

/// A resolved, loadable plugin reference
///
/// The path is always the manifest-declared entry file. Equality, ordering
/// and hashing only look at its normalized string, so references from
/// different sources deduplicate when they point at the same file. The kind
/// and module name are carried along for display and module loaders.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateReference {
    kind: ReferenceKind,
    module_name: String,
    path: PathBuf,
    key: String,
}

impl CandidateReference {
    /// Reference to the entry file of a globally installed package
    pub fn package(package_name: &str, entry: &Path) -> Self {
        Self::build(ReferenceKind::Package, package_name, entry)
    }

    /// Reference to the entry file of a local package directory
    pub fn entry_file(package_name: &str, entry: &Path) -> Self {
        Self::build(ReferenceKind::EntryFile, package_name, entry)
    }

    fn build(kind: ReferenceKind, module_name: &str, path: &Path) -> Self {
        let path = normalize_path(path);
        let key = path.to_string_lossy().into_owned();
        Self {
            kind,
            module_name: module_name.to_string(),
            path,
            key,
        }
    }

    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    /// Package name or local directory entry name
    pub fn module_name(&self) -> &str {
        &self.module_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Normalized string form used as the deduplication key
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl PartialEq for CandidateReference {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for CandidateReference {}

impl Hash for CandidateReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl PartialOrd for CandidateReference {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CandidateReference {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key.cmp(&other.key)
    }
}

impl fmt::Display for CandidateReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Deduplicated set of candidate references
pub type CandidateSet = BTreeSet<CandidateReference>;

/// Stable identity of a plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PluginId(Uuid);

impl PluginId {
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn parse_str(input: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(input).map(Self)
    }

    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PluginId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The plugins produced by one load call, owned by the caller
#[derive(Default)]
pub struct PluginSet {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Plugin> + '_ {
        self.plugins.iter().map(|p| p.as_ref())
    }

    /// Identities of every plugin in the set
    pub fn ids(&self) -> BTreeSet<PluginId> {
        self.plugins.iter().map(|p| p.plugin_id()).collect()
    }

    pub fn get(&self, id: PluginId) -> Option<&dyn Plugin> {
        self.iter().find(|p| p.plugin_id() == id)
    }

    pub fn into_vec(self) -> Vec<Box<dyn Plugin>> {
        self.plugins
    }
}

impl fmt::Debug for PluginSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.plugins.iter().map(|p| p.plugin_id()))
            .finish()
    }
}

impl IntoIterator for PluginSet {
    type Item = Box<dyn Plugin>;
    type IntoIter = std::vec::IntoIter<Box<dyn Plugin>>;

    fn into_iter(self) -> Self::IntoIter {
        self.plugins.into_iter()
    }
}
