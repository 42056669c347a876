//! Objective system settings. Loaded from RON at startup.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::record::ObjectiveId;

/// Tunables for the area highlight and direction indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveConfig {
    /// Height of the area highlight volume in world units.
    #[serde(default = "default_visualizer_height")]
    pub visualizer_height: f32,
    /// Height over which the highlight fades out (forwarded to the shader).
    #[serde(default = "default_fade_height")]
    pub fade_height: f32,
    /// Distance in pixels the indicator keeps from every screen edge.
    #[serde(default = "default_indicator_padding")]
    pub indicator_padding: f32,
    /// Objective that ends the game; while it is current no visuals are shown.
    #[serde(default = "default_terminal_objective")]
    pub terminal_objective: ObjectiveId,
    /// Objective selected when the system starts.
    #[serde(default)]
    pub starting_objective: Option<ObjectiveId>,
}

fn default_visualizer_height() -> f32 {
    10.0
}
fn default_fade_height() -> f32 {
    4.0
}
fn default_indicator_padding() -> f32 {
    48.0
}
fn default_terminal_objective() -> ObjectiveId {
    ObjectiveId::new("final")
}

impl Default for ObjectiveConfig {
    fn default() -> Self {
        Self {
            visualizer_height: default_visualizer_height(),
            fade_height: default_fade_height(),
            indicator_padding: default_indicator_padding(),
            terminal_objective: default_terminal_objective(),
            starting_objective: None,
        }
    }
}

impl ObjectiveConfig {
    /// Load config from `path`. If the file is missing or invalid, returns default config.
    pub fn load(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid objective config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Save current config to `path`. Logs on error.
    pub fn save(&self, path: &Path) {
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(path, s) {
                log::warn!("Could not write objective config to {:?}: {}", path, e);
            }
        }
    }
}
