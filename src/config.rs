//! Configuration management for the typewriter sound emulator.
//!
//! This module provides functionality for loading and managing application
//! configuration: sample files, audio output and the bell threshold.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::audio::Sample;
use crate::error::Error;

/// Audio output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
#[serde(default)]
pub struct AudioConfig {
    /// Audio output device name (e.g., "sysdefault:CARD=PCH")
    /// If not specified, the default device will be used
    pub device: Option<String>,
    /// Playback gain applied to every sample
    pub volume: f32,
    /// Output buffer size in frames, smaller means lower latency.
    /// If not specified, the device default is used
    pub buffer_frames: Option<u32>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            volume: 1.0,
            buffer_frames: None,
        }
    }
}

/// Sample file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
#[serde(default)]
pub struct SampleConfig {
    /// Directory holding the sample files, relative paths resolve from the working directory
    pub dir: PathBuf,
    pub load: String,
    pub shift: String,
    pub delete: String,
    pub space: String,
    pub key: String,
    pub enter: String,
    pub bell: String,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("samples"),
            load: "manual_load_long.wav".to_string(),
            shift: "manual_shift.wav".to_string(),
            delete: "manual_backspace.wav".to_string(),
            space: "manual_space.wav".to_string(),
            key: "manual_key.wav".to_string(),
            enter: "manual_return.wav".to_string(),
            bell: "manual_bell.wav".to_string(),
        }
    }
}

impl SampleConfig {
    /// Full path of the file backing `sample`.
    pub fn path(&self, sample: Sample) -> PathBuf {
        let file = match sample {
            Sample::Load => &self.load,
            Sample::Shift => &self.shift,
            Sample::Delete => &self.delete,
            Sample::Space => &self.space,
            Sample::Key => &self.key,
            Sample::Enter => &self.enter,
            Sample::Bell => &self.bell,
        };
        self.dir.join(file)
    }
}

/// Bell threshold configuration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
#[serde(default)]
pub struct BellConfig {
    /// Consecutive keystrokes after which the counter resets, 0 disables it
    pub threshold: u32,
    /// Ring the bell sample when the threshold is reached
    pub play_at_threshold: bool,
}

impl Default for BellConfig {
    fn default() -> Self {
        Self {
            threshold: 70,
            play_at_threshold: false,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(test, derive(PartialEq))]
#[serde(default)]
pub struct Config {
    /// Play the enter sample once the bank is loaded
    pub startup_sound: bool,
    /// Audio output settings
    pub audio: AudioConfig,
    /// Sample files
    pub samples: SampleConfig,
    /// Bell threshold settings
    pub bell: BellConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            startup_sound: true,
            audio: AudioConfig::default(),
            samples: SampleConfig::default(),
            bell: BellConfig::default(),
        }
    }
}

impl Config {
    /// Gets the default configuration file path.
    fn default_config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .context("Cannot find config directory, pass --config <FILE> instead")?;
        path.push("typewriter-sounds");
        path.push("config.toml");
        Ok(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Rejects values the audio path cannot honour.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.audio.volume.is_finite() || self.audio.volume < 0.0 {
            return Err(Error::Config(format!(
                "audio.volume must be a non-negative number, got {}",
                self.audio.volume
            )));
        }
        if self.audio.buffer_frames == Some(0) {
            return Err(Error::Config("audio.buffer_frames cannot be 0".to_string()));
        }
        Ok(())
    }

    /// Loads configuration from the default location, creating it if it doesn't exist.
    pub fn load_or_write_default(path: Option<&Path>) -> Result<Self> {
        let default_path;
        let path = match path {
            Some(path) => path,
            None => {
                default_path = Self::default_config_path()?;
                &default_path
            }
        };
        if path.exists() {
            return Self::from_file(path)
                .context(format!("Reading default config from {}", path.display()));
        }

        let config = Self::default();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        config.save_to_file(path)?;
        Ok(config)
    }
}
