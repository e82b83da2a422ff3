//! CLI argument parsing tests

use clap::Parser;
use plugseek::app::cli::args::{Args, Command};
use std::path::PathBuf;

#[test]
fn test_global_options_before_subcommand() {
    let args = Args::try_parse_from([
        "plugseek",
        "-c",
        "/etc/plugseek.toml",
        "-p",
        "^acme-.*$",
        "-d",
        "/a,/b",
        "-vvv",
        "--log-format",
        "json",
        "discover",
        "--json",
    ])
    .unwrap();

    assert_eq!(args.config_file, Some(PathBuf::from("/etc/plugseek.toml")));
    assert_eq!(args.pattern.as_deref(), Some("^acme-.*$"));
    assert_eq!(args.plugin_dirs, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
    assert_eq!(args.verbose, 3);
    assert_eq!(args.log_format.as_deref(), Some("json"));
    assert_eq!(args.selected_command(), Command::Discover { json: true });
}

#[test]
fn test_unknown_subcommand_is_rejected() {
    assert!(Args::try_parse_from(["plugseek", "install"]).is_err());
}

#[test]
fn test_registry_timeout_must_be_numeric() {
    assert!(Args::try_parse_from(["plugseek", "--registry-timeout", "soon"]).is_err());
}

#[test]
fn test_long_version_mentions_commit() {
    let error = Args::try_parse_from(["plugseek", "--version"]).unwrap_err();
    assert_eq!(error.kind(), clap::error::ErrorKind::DisplayVersion);
    assert!(plugseek::core::version::long_version().contains("commit"));
}
