//! Configuration module for wandb-watch
//!
//! The simulator reads one TOML file with four sections:
//!
//! - `[timing]` - animation, repeat and loading-timeout durations
//! - `[display]` - screen size and shape of the simulated watch
//! - `[companion]` - where demo data comes from and how slow the link is
//! - `[simulator]` - window zoom and theme
//!
//! Every field has a default, so a partial file (or none at all) loads.
//!
//! # Config Location
//!
//! Unless a path is given on the command line the file is looked up in the
//! platform data directory:
//! - **Linux**: `~/.local/share/dev.wandb-watch/config.toml`
//! - **macOS**: `~/Library/Application Support/dev.wandb-watch/config.toml`
//! - **Windows**: `%APPDATA%\dev.wandb-watch\config.toml`
//!
//! # Example
//!
//! ```toml
//! [timing]
//! scrub_repeat_ms = 120
//!
//! [display]
//! shape = "round"
//! width = 180
//! height = 180
//! ```

use crate::app::{DisplayShape, WatchSettings};
use crate::error::{Result, ResultExt, WatchError};
use crate::render::Size;
use crate::timer::{
    Timings, ANIM_DURATION_MS, LOADING_TIMEOUT_MS, SCRUB_ANIM_DURATION_MS,
    SCRUB_REPEAT_INTERVAL_MS, WIGGLE_ANIM_DURATION_MS,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application identifier for data directories
pub const APP_ID: &str = "dev.wandb-watch";

/// Config filename inside the data directory
pub const CONFIG_FILE: &str = "config.toml";

/// Screen size of a rectangular watch
pub const DEFAULT_DISPLAY_WIDTH: i32 = 144;
pub const DEFAULT_DISPLAY_HEIGHT: i32 = 168;

fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Get the path of the default config file
pub fn default_config_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(CONFIG_FILE))
}

/// Animation and timeout durations, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Paging slide and value interpolation
    pub anim_duration_ms: u64,
    /// Scrub move and history-edge bounce
    pub scrub_anim_ms: u64,
    /// Auto-repeat interval while a button is held
    pub scrub_repeat_ms: u64,
    /// Scrub-entry wiggle
    pub wiggle_ms: u64,
    /// How long to wait for data before showing an error
    pub loading_timeout_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            anim_duration_ms: ANIM_DURATION_MS,
            scrub_anim_ms: SCRUB_ANIM_DURATION_MS,
            scrub_repeat_ms: SCRUB_REPEAT_INTERVAL_MS,
            wiggle_ms: WIGGLE_ANIM_DURATION_MS,
            loading_timeout_ms: LOADING_TIMEOUT_MS,
        }
    }
}

/// Simulated screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: i32,
    pub height: i32,
    pub shape: DisplayShape,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_DISPLAY_WIDTH,
            height: DEFAULT_DISPLAY_HEIGHT,
            shape: DisplayShape::Rect,
        }
    }
}

/// Simulated companion link
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionConfig {
    /// JSON fixture with runs and metrics; built-in demo data when unset
    pub fixture: Option<PathBuf>,
    /// Delay before each batch is delivered
    pub latency_ms: u64,
}

/// Simulator window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatorConfig {
    /// Integer pixel zoom of the watch screen
    pub scale: u32,
    /// Dark window chrome around the screen
    pub dark_mode: bool,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            scale: 3,
            dark_mode: true,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub timing: TimingConfig,
    pub display: DisplayConfig,
    pub companion: CompanionConfig,
    pub simulator: SimulatorConfig,
}

impl AppConfig {
    /// Load a config file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| WatchError::Config(e.to_string()))
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` (or the default location), falling back to defaults.
    ///
    /// A missing file is not an error; an unreadable or invalid one is
    /// logged and ignored.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
            return Self::default();
        };
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Self::default();
        }
        Self::load(&path).unwrap_or_else(|e| {
            tracing::warn!("Failed to load config, using defaults: {}", e);
            Self::default()
        })
    }

    /// Reject values the watch cannot run with
    pub fn validate(&self) -> Result<()> {
        let t = &self.timing;
        if [t.anim_duration_ms, t.scrub_anim_ms, t.scrub_repeat_ms, t.wiggle_ms]
            .contains(&0)
        {
            return Err(WatchError::Config(
                "Animation and repeat durations must be non-zero".to_string(),
            ));
        }
        if self.display.width <= 0 || self.display.height <= 0 {
            return Err(WatchError::Config(format!(
                "Invalid display size {}x{}",
                self.display.width, self.display.height
            )));
        }
        if self.simulator.scale == 0 {
            return Err(WatchError::Config("Simulator scale must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Durations handed to the watch controller
    pub fn timings(&self) -> Timings {
        let t = &self.timing;
        Timings {
            anim_duration: Duration::from_millis(t.anim_duration_ms),
            scrub_anim: Duration::from_millis(t.scrub_anim_ms),
            scrub_repeat: Duration::from_millis(t.scrub_repeat_ms),
            wiggle: Duration::from_millis(t.wiggle_ms),
            loading_timeout: Duration::from_millis(t.loading_timeout_ms),
        }
    }

    /// Device profile for the watch controller
    pub fn watch_settings(&self) -> WatchSettings {
        WatchSettings {
            screen: Size::new(self.display.width, self.display.height),
            shape: self.display.shape,
            timings: self.timings(),
        }
    }

    /// Simulated link latency
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.companion.latency_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_timings_match_watch() {
        let config = AppConfig::default();
        assert_eq!(config.timings(), Timings::default());
        assert_eq!(config.display.shape, DisplayShape::Rect);
        assert_eq!(config.watch_settings(), WatchSettings::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_written_config_loads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE);

        let mut config = AppConfig::default();
        config.display.shape = DisplayShape::Round;
        config.companion.fixture = Some(PathBuf::from("runs.json"));
        config.timing.scrub_repeat_ms = 120;
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[timing]\nwiggle_ms = 500\n\n[display]\nshape = \"round\"\n").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.timing.wiggle_ms, 500);
        assert_eq!(config.timing.anim_duration_ms, ANIM_DURATION_MS);
        assert_eq!(config.display.shape, DisplayShape::Round);
        assert_eq!(config.display.width, DEFAULT_DISPLAY_WIDTH);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[display]\nshape = \"hexagon\"\n").unwrap();
        let err = AppConfig::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to parse config file"));
        assert!(matches!(
            err,
            WatchError::WithContext { source, .. } if matches!(*source, WatchError::Config(_))
        ));
    }

    #[test]
    fn test_zero_duration_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[timing]\nscrub_anim_ms = 0\n").unwrap();
        assert!(AppConfig::load(&path).is_err());
        // ...but load_or_default recovers
        assert_eq!(AppConfig::load_or_default(Some(&path)), AppConfig::default());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");
        assert_eq!(AppConfig::load_or_default(Some(&path)), AppConfig::default());
    }
}
