//! Configuration for gesture control.
//!
//! Loads thresholds and timing from config.json at startup. Every field is
//! optional in the file; missing values fall back to the defaults below.
//!
//! The pixel thresholds were tuned for a 640x512 webcam frame at arm's
//! length. Other resolutions or camera distances need their own values.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// Global configuration instance, initialized once at startup.
static CONFIG: OnceLock<ControlConfig> = OnceLock::new();

/// Screen size used when the OS cannot be asked for it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// Complete gesture control configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Thumb tip to index PIP distance below which the hand is in move mode (pixels)
    #[serde(default = "default_click_distance")]
    pub click_distance: u32,
    /// Index tip to middle tip distance below which a drag is held (pixels)
    #[serde(default = "default_drag_distance")]
    pub drag_distance: u32,
    /// Time after a click during which no move, click or scroll is evaluated
    #[serde(default = "default_click_suppression_ms")]
    pub click_suppression_ms: u64,
    /// Time an action label stays current after the action
    #[serde(default = "default_label_decay_ms")]
    pub label_decay_ms: u64,
    /// Inset of the active frame region on each side (pixels)
    #[serde(default = "default_boundary_margin")]
    pub boundary_margin: u32,
    /// Minimum screen-space movement before the pointer is moved (pixels)
    #[serde(default = "default_dead_zone")]
    pub dead_zone: f64,
    /// Exponential smoothing factor in (0, 1]. 1.0 snaps straight to the target.
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,
    /// Wheel units per scroll action
    #[serde(default = "default_scroll_lines")]
    pub scroll_lines: i32,
    /// Flip landmark x coordinates (selfie view)
    #[serde(default)]
    pub mirror_input: bool,
    /// Log OS actions instead of performing them
    #[serde(default)]
    pub dry_run: bool,
    /// Screen size reported in dry-run mode or when the OS query fails
    #[serde(default)]
    pub fallback_screen: ScreenSize,
}

fn default_click_distance() -> u32 {
    30
}

fn default_drag_distance() -> u32 {
    27
}

fn default_click_suppression_ms() -> u64 {
    300
}

fn default_label_decay_ms() -> u64 {
    200
}

fn default_boundary_margin() -> u32 {
    120
}

fn default_dead_zone() -> f64 {
    10.0
}

fn default_smoothing() -> f64 {
    1.0
}

fn default_scroll_lines() -> i32 {
    100
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            click_distance: default_click_distance(),
            drag_distance: default_drag_distance(),
            click_suppression_ms: default_click_suppression_ms(),
            label_decay_ms: default_label_decay_ms(),
            boundary_margin: default_boundary_margin(),
            dead_zone: default_dead_zone(),
            smoothing: default_smoothing(),
            scroll_lines: default_scroll_lines(),
            mirror_input: false,
            dry_run: false,
            fallback_screen: ScreenSize::default(),
        }
    }
}

impl ControlConfig {
    pub fn click_suppression(&self) -> Duration {
        Duration::from_millis(self.click_suppression_ms)
    }

    pub fn label_decay(&self) -> Duration {
        Duration::from_millis(self.label_decay_ms)
    }

    /// Checks that the values describe a usable controller.
    pub fn validate(&self) -> Result<(), String> {
        if !(self.smoothing > 0.0 && self.smoothing <= 1.0) {
            return Err(format!("smoothing must be in (0, 1], got {}", self.smoothing));
        }
        if !(self.dead_zone >= 0.0) {
            return Err(format!("dead_zone must be non-negative, got {}", self.dead_zone));
        }
        if self.fallback_screen.width == 0 || self.fallback_screen.height == 0 {
            return Err("fallback_screen must be non-empty".to_string());
        }
        Ok(())
    }
}

/// Loads configuration from `path` or returns defaults.
pub fn load_config(path: &Path) -> ControlConfig {
    crate::log(&format!("Looking for config at: {}", path.display()));

    if !path.exists() {
        crate::log("config.json not found. Using default config.");
        return ControlConfig::default();
    }

    let config: ControlConfig = match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(config) => config,
            Err(e) => {
                crate::log(&format!(
                    "Failed to parse config.json: {}. Using defaults.",
                    e
                ));
                return ControlConfig::default();
            }
        },
        Err(e) => {
            crate::log(&format!(
                "Failed to read config.json: {}. Using defaults.",
                e
            ));
            return ControlConfig::default();
        }
    };

    match config.validate() {
        Ok(()) => {
            crate::log("Config loaded from config.json");
            config
        }
        Err(e) => {
            crate::log(&format!("Invalid config.json: {}. Using defaults.", e));
            ControlConfig::default()
        }
    }
}

/// Initializes the global configuration. Call once at startup.
pub fn init_config() {
    let _ = CONFIG.set(load_config(&crate::paths::get_config_path()));
}

/// Returns a reference to the global configuration.
/// Panics if called before init_config().
pub fn get_config() -> &'static ControlConfig {
    CONFIG
        .get()
        .expect("Config not initialized. Call init_config() first.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_shipped_tuning() {
        let config = ControlConfig::default();
        assert_eq!(config.click_distance, 30);
        assert_eq!(config.drag_distance, 27);
        assert_eq!(config.click_suppression(), Duration::from_millis(300));
        assert_eq!(config.label_decay(), Duration::from_millis(200));
        assert_eq!(config.boundary_margin, 120);
        assert_eq!(config.dead_zone, 10.0);
        assert_eq!(config.smoothing, 1.0);
        assert_eq!(config.scroll_lines, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"dead_zone": 4.5, "dry_run": true}"#).unwrap();

        let config = load_config(&path);
        assert_eq!(config.dead_zone, 4.5);
        assert!(config.dry_run);
        assert_eq!(config.click_distance, 30);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.json"));
        assert_eq!(config, ControlConfig::default());
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ nope").unwrap();
        assert_eq!(load_config(&path), ControlConfig::default());
    }

    #[test]
    fn test_invalid_smoothing_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"smoothing": 0.0}"#).unwrap();
        assert_eq!(load_config(&path).smoothing, 1.0);

        let config = ControlConfig {
            smoothing: 1.5,
            ..ControlConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
