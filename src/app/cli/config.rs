//! TOML configuration file parsing and loading
//!
//! Settings are layered: built-in defaults, then the configuration file, then
//! the command line. The merged result is a [`LoaderConfig`].

use crate::app::cli::args::Args;
use crate::core::error_handling::ContextualError;
use crate::plugin::api::{LoaderConfig, RegistryConfig};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Name pattern used when neither the file nor the command line sets one
pub const DEFAULT_PATTERN: &str = r"^plugseek-[\w-]+$";

const CONFIG_DIR_NAME: &str = "Plugseek";
const CONFIG_FILE_NAME: &str = "plugseek.toml";
const PLUGIN_DIR_NAME: &str = "plugins";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("The specified configuration file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Error reading configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing configuration file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

impl ContextualError for ConfigError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<String> {
        Some(self.to_string())
    }
}

/// Accepts either `key = "value"` or `key = ["a", "b"]`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(value) => vec![value],
            OneOrMany::Many(values) => values,
        }
    }
}

/// Contents of a configuration file
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    pub pattern: Option<String>,
    pub plugin_dir: Option<OneOrMany<PathBuf>>,
    pub global: Option<bool>,
    pub registry_program: Option<String>,
    pub registry_timeout: Option<u64>,
    #[serde(default)]
    pub registry_env: BTreeMap<String, String>,
    pub color: Option<bool>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
    pub log_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// `<config dir>/Plugseek/plugseek.toml`, if the platform has a config dir
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// `<config dir>/Plugseek/plugins`, scanned when no directory is configured
pub fn default_plugin_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(PLUGIN_DIR_NAME))
}

/// Load the configuration file
///
/// An explicitly named file must exist. Without one the default location is
/// used only if a file is present there; otherwise defaults apply.
pub async fn load_config_file(explicit: Option<&Path>) -> Result<Option<FileConfig>, ConfigError> {
    let path = match explicit {
        Some(path) => {
            if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            path.to_path_buf()
        }
        None => match default_config_path() {
            Some(path) if tokio::fs::try_exists(&path).await.unwrap_or(false) => path,
            _ => {
                log::debug!("No configuration file found, using defaults");
                return Ok(None);
            }
        },
    };

    let contents = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;

    log::debug!("Loaded configuration from {}", path.display());
    FileConfig::parse(&contents, &path).map(Some)
}

/// Merge defaults, file and command line into a loader configuration
pub fn resolve_loader_config(
    args: &Args,
    file: &FileConfig,
    default_plugin_dir: Option<PathBuf>,
) -> Result<LoaderConfig, ConfigError> {
    let pattern = args
        .pattern
        .clone()
        .or_else(|| file.pattern.clone())
        .unwrap_or_else(|| DEFAULT_PATTERN.to_string());
    if pattern.trim().is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "pattern",
            reason: "must not be empty".to_string(),
        });
    }

    let local_directories = if !args.plugin_dirs.is_empty() {
        dedup_paths(args.plugin_dirs.iter().cloned())
    } else if let Some(dirs) = file.plugin_dir.clone() {
        dedup_paths(dirs.into_vec())
    } else {
        default_plugin_dir.into_iter().collect()
    };

    let global = !args.no_global && file.global.unwrap_or(true);

    let mut registry = RegistryConfig::default();
    if let Some(program) = args
        .registry_program
        .clone()
        .or_else(|| file.registry_program.clone())
    {
        if program.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "registry-program",
                reason: "must not be empty".to_string(),
            });
        }
        registry.program = program;
    }
    if let Some(seconds) = args.registry_timeout.or(file.registry_timeout) {
        if seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "registry-timeout",
                reason: "must be at least one second".to_string(),
            });
        }
        registry.timeout = Duration::from_secs(seconds);
    }
    registry
        .env
        .extend(file.registry_env.iter().map(|(k, v)| (k.clone(), v.clone())));

    Ok(LoaderConfig {
        name_pattern: pattern,
        local_directories,
        global,
        registry,
    })
}

/// Fill logging and colour options the command line left unset
pub fn apply_file_defaults(args: &mut Args, file: &FileConfig) {
    if args.log_level.is_none() {
        args.log_level = file.log_level.clone();
    }
    if args.log_format.is_none() {
        args.log_format = file.log_format.clone();
    }
    if args.log_file.is_none() {
        args.log_file = file.log_file.clone();
    }
    match file.color {
        Some(true) if !args.no_color => args.color = true,
        Some(false) if !args.color => args.no_color = true,
        _ => {}
    }
}

// Order preserving; later duplicates are dropped
fn dedup_paths(paths: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::new();
    for path in paths {
        if !path.as_os_str().is_empty() && !result.contains(&path) {
            result.push(path);
        }
    }
    result
}
