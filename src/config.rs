//! Application configuration management.
//!
//! This module handles the persistent configuration for lyricsync: which
//! audio file and lyric sheet to play, how the sampler and resolver behave,
//! and the geometry of the lyric stack. Configuration is stored in the
//! user's config directory (typically ~/.config/lyricsync/config.toml). A
//! missing file means defaults; command line flags override stored values.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::animator::StageLayout;
use crate::constants::{DEFAULT_AUDIO_FILE, DEFAULT_LINE_GAP, DEFAULT_ROW_HEIGHT, DEFAULT_TICK};
use crate::sync::{Resolver, SyncMode};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_audio_file")]
    pub audio_file: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet_file: Option<String>,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default)]
    pub sync_mode: SyncMode,
    #[serde(default)]
    pub detect_rewind: bool,
    #[serde(default)]
    pub loop_playback: bool,
    #[serde(default = "default_row_height")]
    pub row_height: f32,
    #[serde(default = "default_line_gap")]
    pub line_gap: f32,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_audio_file() -> String {
    DEFAULT_AUDIO_FILE.to_string()
}

fn default_tick_ms() -> u64 {
    DEFAULT_TICK.as_millis() as u64
}

fn default_row_height() -> f32 {
    DEFAULT_ROW_HEIGHT
}

fn default_line_gap() -> f32 {
    DEFAULT_LINE_GAP
}

fn default_log_file() -> String {
    std::env::temp_dir()
        .join("lyricsync.log")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Self {
            audio_file: default_audio_file(),
            sheet_file: None,
            tick_ms: default_tick_ms(),
            sync_mode: SyncMode::default(),
            detect_rewind: false,
            loop_playback: false,
            row_height: default_row_height(),
            line_gap: default_line_gap(),
            log_file: default_log_file(),
        }
    }

    pub fn config_dir() -> Result<PathBuf, Box<dyn Error>> {
        // Check for XDG_CONFIG_HOME first (useful for testing)
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config).join("lyricsync")
        } else {
            dirs::config_dir()
                .ok_or("Unable to find config directory")?
                .join("lyricsync")
        };
        Ok(config_dir)
    }

    pub fn config_path() -> Result<PathBuf, Box<dyn Error>> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> Result<Self, Box<dyn Error>> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Default::default());
        }

        let contents = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<(), Box<dyn Error>> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()?;
        let toml_string = toml::to_string_pretty(self)?;
        fs::write(&config_path, toml_string)?;

        Ok(())
    }

    pub fn exists() -> Result<bool, Box<dyn Error>> {
        Ok(Self::config_path()?.exists())
    }

    fn validate(&self) -> Result<(), Box<dyn Error>> {
        if self.tick_ms == 0 {
            return Err("tick_ms must be greater than zero".into());
        }
        if !(self.row_height.is_finite() && self.row_height > 0.0) {
            return Err("row_height must be a positive number".into());
        }
        if !(self.line_gap.is_finite() && self.line_gap >= 0.0) {
            return Err("line_gap must be zero or a positive number".into());
        }
        Ok(())
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        match key {
            "audio_file" => self.audio_file = value.to_string(),
            "sheet_file" => {
                self.sheet_file = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                }
            }
            "tick_ms" => {
                self.tick_ms = value
                    .parse::<u64>()
                    .map_err(|_| "Value must be a whole number of milliseconds")?;
            }
            "sync_mode" => self.sync_mode = value.parse::<SyncMode>()?,
            "detect_rewind" => self.detect_rewind = parse_bool(value)?,
            "loop_playback" => self.loop_playback = parse_bool(value)?,
            "row_height" => {
                self.row_height = value
                    .parse::<f32>()
                    .map_err(|_| "Value must be a number")?;
            }
            "line_gap" => {
                self.line_gap = value
                    .parse::<f32>()
                    .map_err(|_| "Value must be a number")?;
            }
            "log_file" => self.log_file = value.to_string(),
            _ => return Err(format!("Unknown configuration key: {key}").into()),
        }
        self.validate()
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn resolver(&self) -> Resolver {
        Resolver::new(self.sync_mode, self.detect_rewind)
    }

    pub fn layout(&self) -> StageLayout {
        StageLayout {
            row_height: self.row_height,
            line_gap: self.line_gap,
        }
    }
}

fn parse_bool(value: &str) -> Result<bool, Box<dyn Error>> {
    Ok(value
        .parse::<bool>()
        .map_err(|_| "Value must be 'true' or 'false'")?)
}

/// Keys accepted by `config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "audio_file",
    "sheet_file",
    "tick_ms",
    "sync_mode",
    "detect_rewind",
    "loop_playback",
    "row_height",
    "line_gap",
    "log_file",
];
