//! Command line arguments
//!
//! Every option here also has a configuration file counterpart; values given
//! on the command line take precedence (see [`config`](super::config)).

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "plugseek")]
#[command(about = "Discover and load plugin packages")]
#[command(version, long_version = crate::core::version::long_version())]
#[command(after_help = " * can be specified multiple times or as a comma-separated list")]
pub struct Args {
    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Regular expression plugin package names must match
    #[arg(short = 'p', long = "pattern", value_name = "REGEX")]
    pub pattern: Option<String>,

    /// Local plugin directories to scan*
    #[arg(
        short = 'd',
        long = "plugin-dir",
        value_name = "DIRS",
        action = ArgAction::Append,
        value_delimiter = ','
    )]
    pub plugin_dirs: Vec<PathBuf>,

    /// Do not query the globally installed packages
    #[arg(long = "no-global")]
    pub no_global: bool,

    /// Package manager used to list global packages
    #[arg(long = "registry-program", value_name = "PROGRAM")]
    pub registry_program: Option<String>,

    /// Seconds to wait for the package manager
    #[arg(long = "registry-timeout", value_name = "SECONDS")]
    pub registry_timeout: Option<u64>,

    /// Verbose output (can be used multiple times for more verbosity)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (can be used multiple times for less verbosity)
    #[arg(short = 'q', long = "quiet", action = ArgAction::Count)]
    pub quiet: u8,

    /// Force colored output (overrides TTY detection and NO_COLOR)
    #[arg(long = "color")]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color", conflicts_with = "color")]
    pub no_color: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List plugin candidates without loading them (default)
    Discover {
        /// Print candidates as JSON
        #[arg(long)]
        json: bool,
    },
    /// Load and instantiate every plugin
    Load {
        /// Print loaded plugins as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Args {
    /// The requested subcommand; `discover` when none was given
    pub fn selected_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or(Command::Discover { json: false })
    }

    /// Colour decision: explicit flags first, then `NO_COLOR`, then TTY detection
    pub fn use_color(&self, stdout_is_terminal: bool) -> bool {
        if self.no_color {
            false
        } else if self.color {
            true
        } else {
            std::env::var_os("NO_COLOR").is_none() && stdout_is_terminal
        }
    }

    /// Log file, with the magic values `none` and `-` disabling file output
    pub fn log_file(&self) -> Option<&PathBuf> {
        self.log_file.as_ref().filter(|path| {
            let raw = path.as_os_str();
            !(raw.eq_ignore_ascii_case("none") || raw == "-")
        })
    }
}
