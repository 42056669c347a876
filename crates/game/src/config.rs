//! Session configuration (screen, pacing, data files). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Session settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Screen width in pixels (indicator projection).
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Screen height in pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Simulation rate in Hz.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f64,
    /// Walking speed of the scripted player (m/s).
    #[serde(default = "default_walk_speed")]
    pub walk_speed: f32,
    /// Climbing speed of the scripted player (m/s).
    #[serde(default = "default_climb_speed")]
    pub climb_speed: f32,
    /// Give up if the objective chain has not finished after this many frames.
    #[serde(default = "default_max_frames")]
    pub max_frames: u64,
    /// Objective system settings file.
    #[serde(default = "default_objective_config")]
    pub objective_config: PathBuf,
    /// Authored objective list. Built-in objectives are used when the file is absent.
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_tick_rate() -> f64 {
    60.0
}
fn default_walk_speed() -> f32 {
    6.0
}
fn default_climb_speed() -> f32 {
    3.0
}
fn default_max_frames() -> u64 {
    60 * 60 * 5
}
fn default_objective_config() -> PathBuf {
    PathBuf::from("objective_config.ron")
}
fn default_catalog() -> PathBuf {
    PathBuf::from("objectives.ron")
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            tick_rate: default_tick_rate(),
            walk_speed: default_walk_speed(),
            climb_speed: default_climb_speed(),
            max_frames: default_max_frames(),
            objective_config: default_objective_config(),
            catalog: default_catalog(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}
