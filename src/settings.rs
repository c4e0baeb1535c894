//! User-facing engine settings, persisted as JSON alongside the project.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Engine toggles the host surfaces in its settings menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Abort runaway loops at [`Settings::loop_iteration_cap`] iterations.
    /// Disabling this is an explicit opt-in risk: the loop runs unbounded
    /// and a one-time warning is logged.
    pub infinite_loop_protection: bool,
    /// Iterations a Loop node may run per activation while protection is
    /// on.
    pub loop_iteration_cap: u32,
    /// Host debug overlay: draw hitbox outlines over the scene.
    pub show_hitboxes: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            infinite_loop_protection: true,
            loop_iteration_cap: 1000,
            show_hitboxes: false,
        }
    }
}

impl Settings {
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self).map_err(|e| e.to_string())?;
        fs::write(path, json).map_err(|e| e.to_string())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, String> {
        let json = fs::read_to_string(path).map_err(|e| e.to_string())?;
        serde_json::from_str(&json).map_err(|e| e.to_string())
    }
}
