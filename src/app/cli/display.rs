//! CLI display utilities for formatting output

use crate::plugin::api::{CandidateSet, PluginDescriptor, PluginSet};
use colored::Colorize;

/// Column width for the first column of plain listings
const NAME_COLUMN_WIDTH: usize = 24;

/// Candidate listing, one reference per line: module name then location
pub fn render_candidates(candidates: &CandidateSet, use_color: bool) -> String {
    let mut output = header_line(
        &format!("{:<width$} {}", "Module", "Location", width = NAME_COLUMN_WIDTH),
        use_color,
    );

    for candidate in candidates {
        let name = format!("{:<width$}", candidate.module_name(), width = NAME_COLUMN_WIDTH);
        let name = if use_color {
            name.blue().to_string()
        } else {
            name
        };
        output.push_str(&format!("{} {}\n", name, candidate.key()));
    }
    output
}

pub fn render_candidates_json(candidates: &CandidateSet) -> serde_json::Result<String> {
    let list: Vec<_> = candidates.iter().collect();
    serde_json::to_string_pretty(&list)
}

/// Plugin listing: id and name on one line, indented description below
pub fn render_plugins(plugins: &PluginSet, use_color: bool) -> String {
    let mut output = header_line(&format!("{:<36} {}", "Plugin", "Name / Description"), use_color);

    for plugin in plugins.iter() {
        let id = plugin.plugin_id().to_string();
        let id = if use_color { id.blue().to_string() } else { id };
        output.push_str(&format!("{} {}\n", id, plugin.display_name()));
        output.push_str(&format!("{:<36} {}\n", "", single_line(plugin.description())));
    }
    output
}

pub fn render_plugins_json(plugins: &PluginSet) -> serde_json::Result<String> {
    let list: Vec<PluginDescriptor> = plugins.iter().map(PluginDescriptor::of).collect();
    serde_json::to_string_pretty(&list)
}

fn header_line(text: &str, use_color: bool) -> String {
    if use_color {
        format!("{}\n", text.cyan())
    } else {
        format!("{}\n", text)
    }
}

// Descriptions are plain text but may span lines
fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
