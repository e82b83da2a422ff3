//! Plugin Trait
//!
//! The capability contract every loaded plugin satisfies. The loader only
//! checks it structurally: a non-nil identity, a display name and a plain-text
//! description.

use crate::plugin::types::PluginId;
use serde::Serialize;

/// Base plugin trait that all plugins must implement
pub trait Plugin: Send + Sync {
    /// Stable identity of the plugin, constant across versions
    fn plugin_id(&self) -> PluginId;

    /// Name the host application can display
    fn display_name(&self) -> &str;

    /// Plain-text description the host application can display
    fn description(&self) -> &str;
}

/// Plain data plugin, enough for modules that only describe themselves
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginDescriptor {
    pub plugin_id: PluginId,
    pub display_name: String,
    pub description: String,
}

impl PluginDescriptor {
    pub fn new(
        plugin_id: PluginId,
        display_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            plugin_id,
            display_name: display_name.into(),
            description: description.into(),
        }
    }

    /// Snapshot of any plugin's descriptive fields
    pub fn of(plugin: &dyn Plugin) -> Self {
        Self::new(plugin.plugin_id(), plugin.display_name(), plugin.description())
    }
}

impl Plugin for PluginDescriptor {
    fn plugin_id(&self) -> PluginId {
        self.plugin_id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn description(&self) -> &str {
        &self.description
    }
}
