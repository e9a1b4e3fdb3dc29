use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use stitchview_core::{AnimationSpeed, ViewMode, VisualizationStore};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid viewer config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Viewer settings, read from a JSON file. Any key may be omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub viewport: ViewportSettings,
    pub announce_delay_ms: u64,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportSettings {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewportSettings {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 400.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub highlight_changes: bool,
    pub show_stitch_count: bool,
    pub show_round_numbers: bool,
    pub animation_speed: AnimationSpeed,
    pub view_mode: ViewMode,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            highlight_changes: true,
            show_stitch_count: true,
            show_round_numbers: true,
            animation_speed: AnimationSpeed::Medium,
            view_mode: ViewMode::TwoD,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportSettings::default(),
            announce_delay_ms: 300,
            display: DisplaySettings::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded viewer config from {}", path.display());
        Ok(config)
    }

    pub fn announce_delay(&self) -> Duration {
        Duration::from_millis(self.announce_delay_ms)
    }

    /// Push the display preferences into a store.
    pub fn apply_to(&self, store: &mut VisualizationStore) {
        let d = &self.display;
        store.set_highlight_changes(d.highlight_changes);
        store.set_show_stitch_count(d.show_stitch_count);
        store.set_show_round_numbers(d.show_round_numbers);
        store.set_animation_speed(d.animation_speed);
        store.set_view_mode(d.view_mode);
    }
}
