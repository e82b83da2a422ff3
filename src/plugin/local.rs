//! Local plugin source
//!
//! Scans plugin directories for package directories whose name matches, and
//! resolves each to the entry file declared by its manifest.
//!
//! Entries that simply are not plugins are skipped quietly: a missing
//! directory, a matching plain file, a package without manifest, a manifest
//! without `main`, or a `main` pointing at a file that does not exist. Any
//! other I/O failure, and a manifest that cannot be parsed, is an error.

use crate::core::paths::absolute_normalized;
use crate::plugin::error::{DiscoveryDetail, PluginError, PluginResult};
use crate::plugin::manifest::{PluginManifest, MANIFEST_FILE};
use crate::plugin::matcher::NameMatcher;
use crate::plugin::types::{CandidateReference, CandidateSet};
use futures::future::try_join_all;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub struct LocalSource {
    matcher: NameMatcher,
}

impl LocalSource {
    pub fn new(matcher: NameMatcher) -> Self {
        Self { matcher }
    }

    /// Scan every directory and union the resolved entry files
    ///
    /// Directories are scanned concurrently; the first failure aborts the scan.
    pub async fn list_local_candidates(&self, directories: &[PathBuf]) -> PluginResult<CandidateSet> {
        let scans = directories
            .iter()
            .map(|directory| self.scan_directory(directory));
        let per_directory = try_join_all(scans).await?;

        Ok(per_directory.into_iter().flatten().collect())
    }

    async fn scan_directory(&self, directory: &Path) -> PluginResult<CandidateSet> {
        let mut candidates = CandidateSet::new();
        let directory = absolute_normalized(directory).map_err(|source| {
            PluginError::local(DiscoveryDetail::ReadDirectory {
                path: directory.to_path_buf(),
                source,
            })
        })?;

        match tokio::fs::metadata(&directory).await {
            Ok(metadata) if metadata.is_dir() => {}
            Ok(_) => {
                log::debug!("{} is not a directory, skipping", directory.display());
                return Ok(candidates);
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("Plugin directory {} does not exist", directory.display());
                return Ok(candidates);
            }
            Err(source) => {
                return Err(PluginError::local(DiscoveryDetail::ReadDirectory {
                    path: directory,
                    source,
                }))
            }
        }

        let read_error = |source| {
            PluginError::local(DiscoveryDetail::ReadDirectory {
                path: directory.clone(),
                source,
            })
        };
        let mut entries = tokio::fs::read_dir(&directory).await.map_err(read_error)?;

        while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                log::trace!("Skipping non UTF-8 entry {:?}", file_name);
                continue;
            };
            if !self.matcher.matches(name) {
                continue;
            }

            let package_dir = entry.path();
            if !is_directory(&package_dir).await.map_err(PluginError::local)? {
                log::trace!("{} matches but is not a directory", package_dir.display());
                continue;
            }

            if let Some(entry) = resolve_package(&package_dir)
                .await
                .map_err(PluginError::local)?
            {
                let reference = CandidateReference::entry_file(name, &entry);
                log::debug!("Local plugin candidate: {}", reference);
                candidates.insert(reference);
            }
        }

        log::debug!(
            "Found {} local candidates in {}",
            candidates.len(),
            directory.display()
        );
        Ok(candidates)
    }
}

// Follows symlinks; a dangling link is not a directory
async fn is_directory(path: &Path) -> Result<bool, DiscoveryDetail> {
    match tokio::fs::metadata(path).await {
        Ok(metadata) => Ok(metadata.is_dir()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(DiscoveryDetail::ReadDirectory {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Resolve a package directory to the entry file its manifest declares
///
/// `Ok(None)` means the directory is not a plugin package. Callers decide
/// which source an error is reported against.
pub(crate) async fn resolve_package(package_dir: &Path) -> Result<Option<PathBuf>, DiscoveryDetail> {
    let manifest_path = package_dir.join(MANIFEST_FILE);

    let content = match tokio::fs::read_to_string(&manifest_path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::trace!("{} has no manifest", package_dir.display());
            return Ok(None);
        }
        Err(source) => {
            return Err(DiscoveryDetail::ReadManifest {
                path: manifest_path,
                source,
            })
        }
    };

    let manifest =
        PluginManifest::parse(&content).map_err(|source| DiscoveryDetail::ManifestParse {
            path: manifest_path.clone(),
            source,
        })?;

    let Some(entry) = manifest.resolve_entry(package_dir) else {
        log::debug!("{} declares no main entry", manifest_path.display());
        return Ok(None);
    };

    match tokio::fs::metadata(&entry).await {
        Ok(_) => Ok(Some(entry)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::debug!(
                "{} declares missing entry {}",
                manifest_path.display(),
                entry.display()
            );
            Ok(None)
        }
        Err(source) => Err(DiscoveryDetail::ReadEntry {
            path: entry,
            source,
        }),
    }
}
