//! Configuration schema definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub rules: RulesConfig,

    #[serde(default)]
    pub preferences: PreferencesConfig,
}

/// Engine timing and housekeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Observation batches between ledger garbage collections.
    #[serde(default = "default_gc_threshold")]
    pub gc_threshold: u32,

    /// Delay between clearing the live region and writing the message.
    #[serde(default = "default_announce_delay_ms")]
    pub announce_delay_ms: u64,

    /// Animation frame interval used by the host driver.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Initial state when no preference has been saved.
    #[serde(default = "default_start_enabled")]
    pub start_enabled: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gc_threshold: default_gc_threshold(),
            announce_delay_ms: default_announce_delay_ms(),
            frame_interval_ms: default_frame_interval_ms(),
            start_enabled: default_start_enabled(),
        }
    }
}

fn default_gc_threshold() -> u32 {
    80
}

fn default_announce_delay_ms() -> u64 {
    50
}

fn default_frame_interval_ms() -> u64 {
    16
}

fn default_start_enabled() -> bool {
    true
}

/// Rule selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Rule names to switch off.
    #[serde(default)]
    pub disabled: Vec<String>,

    #[serde(default = "default_skip_link_text")]
    pub skip_link_text: String,

    /// Extra class substrings that mark feed or list entries.
    #[serde(default)]
    pub item_class_patterns: Vec<String>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            disabled: Vec::new(),
            skip_link_text: default_skip_link_text(),
            item_class_patterns: Vec::new(),
        }
    }
}

fn default_skip_link_text() -> String {
    "Skip to main content".to_string()
}

/// Where the on/off preference is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreferencesConfig {
    /// Overrides the platform config directory location.
    #[serde(default)]
    pub path: Option<PathBuf>,
}
