//! Tests for the CLI module
//!
//! Argument parsing, configuration layering and output formatting.
