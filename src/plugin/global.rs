//! Global plugin source
//!
//! Filters the packages listed by the installed-package registry and resolves
//! each match under the install root to the entry file its manifest declares,
//! exactly like a local package. A global package that is also reachable
//! through a local directory therefore yields the same reference.

use crate::plugin::error::{DiscoveryDetail, PluginError, PluginResult};
use crate::plugin::local::resolve_package;
use crate::plugin::matcher::NameMatcher;
use crate::plugin::registry::{PackageRegistry, RegistryError};
use crate::plugin::types::{CandidateReference, CandidateSet};
use futures::future::try_join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub struct GlobalSource {
    matcher: NameMatcher,
    registry: Arc<dyn PackageRegistry>,
    timeout: Duration,
}

impl GlobalSource {
    pub fn new(matcher: NameMatcher, registry: Arc<dyn PackageRegistry>, timeout: Duration) -> Self {
        Self {
            matcher,
            registry,
            timeout,
        }
    }

    /// Query the registry and keep the packages whose name matches
    pub async fn list_global_candidates(&self) -> PluginResult<CandidateSet> {
        self.list_global_candidates_until(&CancellationToken::new())
            .await
    }

    /// Like [`list_global_candidates`](Self::list_global_candidates), giving up
    /// when `cancel` fires or the configured timeout elapses
    pub async fn list_global_candidates_until(
        &self,
        cancel: &CancellationToken,
    ) -> PluginResult<CandidateSet> {
        let installed = tokio::select! {
            _ = cancel.cancelled() => Err(RegistryError::Cancelled),
            result = tokio::time::timeout(self.timeout, self.registry.list_installed_packages()) => {
                result.unwrap_or(Err(RegistryError::Timeout(self.timeout)))
            }
        }
        .map_err(PluginError::global)?;

        let matching: Vec<&String> = installed
            .names
            .iter()
            .filter(|name| self.matcher.matches(name))
            .collect();
        log::debug!(
            "Global registry: {} of {} installed packages match '{}'",
            matching.len(),
            installed.names.len(),
            self.matcher.as_str()
        );

        let install_root = &installed.install_root;
        let resolved = try_join_all(matching.into_iter().map(|name| async move {
            let entry = resolve_package(&install_root.join(name)).await?;
            Ok::<_, DiscoveryDetail>(entry.map(|entry| CandidateReference::package(name, &entry)))
        }))
        .await
        .map_err(PluginError::global)?;

        let candidates: CandidateSet = resolved.into_iter().flatten().collect();
        for reference in &candidates {
            log::debug!("Global plugin candidate: {}", reference);
        }
        Ok(candidates)
    }
}
