//! Plugin name matching

use crate::plugin::error::{PluginError, PluginResult};
use regex::Regex;

/// Tests package names and directory entry names against the configured pattern
///
/// The pattern is applied as written: `^`/`$` anchor only when the pattern says
/// so.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    pattern: Regex,
}

impl NameMatcher {
    /// Compile a matcher; an invalid pattern is reported here, never per call
    pub fn new(pattern: &str) -> PluginResult<Self> {
        let pattern = Regex::new(pattern).map_err(|source| PluginError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { pattern })
    }

    pub fn from_regex(pattern: Regex) -> Self {
        Self { pattern }
    }

    pub fn matches(&self, candidate_name: &str) -> bool {
        self.pattern.is_match(candidate_name)
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}
