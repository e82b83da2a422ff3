//! Package Registry
//!
//! The global source asks a [`PackageRegistry`] which top-level packages are
//! installed and where. [`NpmRegistry`] shells out to the npm CLI;
//! [`StaticRegistry`] serves a fixed listing.

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Installed top-level packages and the directory they are installed under
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledPackages {
    pub install_root: PathBuf,
    pub names: BTreeSet<String>,
}

/// Errors reported by a package registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    #[error("'{command}' exited with {status}: {stderr}")]
    Exit {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("malformed registry output: {0}")]
    Malformed(String),

    #[error("registry query timed out after {0:?}")]
    Timeout(Duration),

    #[error("registry query cancelled")]
    Cancelled,
}

/// Source of installed package names
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// List installed top-level packages together with their install root
    async fn list_installed_packages(&self) -> Result<InstalledPackages, RegistryError>;
}

/// How the registry query is run
///
/// The child process environment is built from `env` only on top of the
/// inherited environment; the current process environment is never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryConfig {
    /// Program to run
    pub program: String,
    /// Arguments placed before the registry sub-command (e.g. a wrapper script)
    pub leading_args: Vec<String>,
    /// Extra environment variables for the child process
    pub env: BTreeMap<String, String>,
    /// Upper bound for the whole registry query
    pub timeout: Duration,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            program: "npm".to_string(),
            leading_args: Vec::new(),
            env: default_registry_env(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Environment that keeps npm quiet and non-interactive
pub fn default_registry_env() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("npm_config_loglevel".to_string(), "silent".to_string()),
        ("npm_update_notifier".to_string(), "false".to_string()),
    ])
}

/// Registry backed by the npm CLI
///
/// Runs `npm root -g` for the install root and `npm ls -g --json --depth=0`
/// for the package names.
#[derive(Debug, Clone, Default)]
pub struct NpmRegistry {
    config: RegistryConfig,
}

impl NpmRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    async fn run(&self, args: &[&str]) -> Result<String, RegistryError> {
        let mut command = Command::new(&self.config.program);
        command
            .args(&self.config.leading_args)
            .args(args)
            .envs(&self.config.env)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let command_line = format!("{} {}", self.config.program, args.join(" "));
        log::debug!("Querying package registry: {}", command_line);

        let output = command
            .output()
            .await
            .map_err(|source| RegistryError::Spawn {
                program: self.config.program.clone(),
                source,
            })?;
        let stdout = String::from_utf8(output.stdout).map_err(|e| {
            RegistryError::Malformed(format!("'{}' printed non UTF-8 output: {}", command_line, e))
        })?;

        if !output.status.success() {
            // npm ls exits non-zero on extraneous or missing packages but
            // still prints a usable listing
            if stdout.trim().is_empty() {
                return Err(RegistryError::Exit {
                    command: command_line,
                    status: output.status,
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                });
            }
            log::debug!(
                "'{}' exited with {}, using its output anyway",
                command_line,
                output.status
            );
        }

        Ok(stdout)
    }

    /// Parse the install root printed by `npm root -g`
    pub fn parse_install_root(output: &str) -> Result<PathBuf, RegistryError> {
        let root = output.trim();
        if root.is_empty() {
            return Err(RegistryError::Malformed(
                "empty global install root".to_string(),
            ));
        }
        Ok(PathBuf::from(root))
    }

    /// Parse the package names out of `npm ls -g --json --depth=0`
    pub fn parse_listing(output: &str) -> Result<BTreeSet<String>, RegistryError> {
        let listing: serde_json::Value = serde_json::from_str(output)
            .map_err(|e| RegistryError::Malformed(format!("invalid package listing: {}", e)))?;
        let listing = listing.as_object().ok_or_else(|| {
            RegistryError::Malformed("package listing is not a JSON object".to_string())
        })?;

        match listing.get("dependencies") {
            None | Some(serde_json::Value::Null) => Ok(BTreeSet::new()),
            Some(serde_json::Value::Object(dependencies)) => {
                Ok(dependencies.keys().cloned().collect())
            }
            Some(_) => Err(RegistryError::Malformed(
                "'dependencies' is not a JSON object".to_string(),
            )),
        }
    }
}

#[async_trait]
impl PackageRegistry for NpmRegistry {
    async fn list_installed_packages(&self) -> Result<InstalledPackages, RegistryError> {
        let (root_output, listing_output) = tokio::try_join!(
            self.run(&["root", "-g"]),
            self.run(&["ls", "-g", "--json", "--depth=0"])
        )?;

        let installed = InstalledPackages {
            install_root: Self::parse_install_root(&root_output)?,
            names: Self::parse_listing(&listing_output)?,
        };
        log::debug!(
            "Registry lists {} packages under {}",
            installed.names.len(),
            installed.install_root.display()
        );
        Ok(installed)
    }
}

/// Registry with a fixed package listing
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    installed: InstalledPackages,
}

impl StaticRegistry {
    pub fn new<I, S>(install_root: impl Into<PathBuf>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            installed: InstalledPackages {
                install_root: install_root.into(),
                names: names.into_iter().map(Into::into).collect(),
            },
        }
    }

    /// Registry with nothing installed
    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PackageRegistry for StaticRegistry {
    async fn list_installed_packages(&self) -> Result<InstalledPackages, RegistryError> {
        Ok(self.installed.clone())
    }
}
