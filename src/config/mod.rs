//! Configuration management for the touchpad decoder
//!
//! Handles loading and saving the YAML application configuration, plus the
//! INI dialect skins are written in.

pub mod ini;
pub mod watcher;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::input::{PointerTable, TouchPad, TouchResolver, MAX_POINTERS};
use crate::skin::{PadSize, SkinLoader};

pub use watcher::SkinWatcher;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub touchpad: TouchpadConfig,
}

/// Touch surface and skin selection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TouchpadConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Skin to load; falls back to the first entry of the skin listing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin: Option<String>,
    /// Directory holding one sub-directory per skin
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skins_dir: Option<PathBuf>,
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    /// Highest pointer id examined each frame
    #[serde(default = "default_max_pid")]
    pub max_pid: usize,
    /// The surface reports y growing upward
    #[serde(default = "default_true")]
    pub invert_y: bool,
    #[serde(default)]
    pub octagon_joystick: bool,
}

impl Default for TouchpadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            skin: None,
            skins_dir: None,
            width: default_width(),
            height: default_height(),
            max_pid: default_max_pid(),
            invert_y: true,
            octagon_joystick: false,
        }
    }
}

impl TouchpadConfig {
    pub fn pad(&self) -> PadSize {
        PadSize {
            width: self.width,
            height: self.height,
        }
    }

    pub fn loader(&self) -> SkinLoader {
        SkinLoader::new(self.pad())
    }

    /// A fresh touch surface configured from these settings
    pub fn touch_pad(&self) -> TouchPad {
        let mut table = PointerTable::new(self.max_pid);
        if self.invert_y {
            table = table.inverted(self.height);
        }
        TouchPad::new(TouchResolver::new(self.octagon_joystick), table)
    }
}

impl AppConfig {
    /// Load configuration from file with validation
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: AppConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?;

        config.validate()?;

        Ok(config)
    }

    /// Save configuration to file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config to YAML")?;

        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration for correctness and consistency
    pub fn validate(&self) -> Result<()> {
        let tp = &self.touchpad;

        if tp.width <= 0 || tp.height <= 0 {
            anyhow::bail!(
                "Touchpad size must be positive (got {}x{})",
                tp.width,
                tp.height
            );
        }
        if tp.max_pid >= MAX_POINTERS {
            anyhow::bail!(
                "Touchpad max_pid {} is out of range (must be below {})",
                tp.max_pid,
                MAX_POINTERS
            );
        }
        if let Some(skin) = &tp.skin {
            if skin.is_empty() || skin.contains(['/', '\\']) {
                anyhow::bail!("Invalid skin name '{}'", skin);
            }
        }

        Ok(())
    }
}

// Default value functions
fn default_true() -> bool { true }
fn default_width() -> i32 { PadSize::XPERIA_PLAY.width }
fn default_height() -> i32 { PadSize::XPERIA_PLAY.height }
fn default_max_pid() -> usize { crate::input::DEFAULT_MAX_PID }
