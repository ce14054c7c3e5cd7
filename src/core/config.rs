use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::strings::StringTable;
use crate::errors::Result;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub markup: MarkupConfig,
    pub session: SessionConfig,
    pub strings: StringTable,
}

/// Class names and tokens the provider management page renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupConfig {
    pub visibility_marker: String,
    pub edit_marker: String,
    pub details_class: String,
    pub field_container_class: String,
    /// Icon shown on an enabled provider (the "hide" affordance).
    pub enabled_icon: String,
    /// Icon shown on a disabled provider (the "show" affordance).
    pub disabled_icon: String,
    pub filter_placeholder: String,
    pub save_changes_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub headless: bool,
    pub element_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            visibility_marker: "filter-oembed-visibility".to_string(),
            edit_marker: "filter-oembed-edit".to_string(),
            details_class: "oembed-provider-details".to_string(),
            field_container_class: "felement".to_string(),
            enabled_icon: "t/hide".to_string(),
            disabled_icon: "t/show".to_string(),
            filter_placeholder: "Provider".to_string(),
            save_changes_key: "savechanges".to_string(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            element_timeout_ms: 2000,
            poll_interval_ms: 100,
        }
    }
}
