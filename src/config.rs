// SPDX-License-Identifier: GPL-3.0-only

//! User configuration
//!
//! Loaded from `$XDG_CONFIG_HOME/valentine-booth/config.toml` (or a path given
//! on the command line). Every field has a default, so an empty or missing file
//! is valid.

use crate::constants::{self, timing};
use crate::errors::ConfigError;
use crate::pipelines::photo::Glyph;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Camera device selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// V4L2 device index (`/dev/videoN`)
    pub device: usize,
    /// Requested capture width (the driver may pick the closest)
    pub width: u32,
    /// Requested capture height
    pub height: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            device: 0,
            width: constants::camera::DEFAULT_WIDTH,
            height: constants::camera::DEFAULT_HEIGHT,
        }
    }
}

/// A sticker that is part of the booth frame rather than the user's edit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedSticker {
    pub glyph: Glyph,
    /// Sprite center as a fraction of the image width
    pub x: f32,
    /// Sprite center as a fraction of the image height
    pub y: f32,
    /// Edge length as a fraction of the shorter image side
    pub size: f32,
    /// Clockwise tilt in degrees
    #[serde(default)]
    pub rotation: f32,
}

impl FixedSticker {
    pub fn new(glyph: Glyph, x: f32, y: f32, size: f32) -> Self {
        Self {
            glyph,
            x,
            y,
            size,
            rotation: 0.0,
        }
    }
}

/// Fixed booth frame drawn over every exported photo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecorationSettings {
    /// Translucent white inset border
    pub border: bool,
    /// Text of the date stamp at the top (None hides it)
    pub date_stamp: Option<String>,
    /// Sprite drawn right after the date stamp
    pub stamp_sticker: Option<Glyph>,
    /// Caption at the bottom (None hides it)
    pub caption: Option<String>,
    /// Floating stickers at fixed spots
    pub stickers: Vec<FixedSticker>,
}

impl Default for DecorationSettings {
    fn default() -> Self {
        Self {
            border: true,
            date_stamp: Some("FEB 14, 2026".to_string()),
            stamp_sticker: Some(Glyph::SparklingHeart),
            caption: Some("SHE SAID YES!".to_string()),
            stickers: vec![
                FixedSticker::new(Glyph::Bear, 0.9, 0.12, 0.14),
                FixedSticker::new(Glyph::Smitten, 0.1, 0.76, 0.14),
                FixedSticker {
                    rotation: 12.0,
                    ..FixedSticker::new(Glyph::Sparkles, 0.95, 0.5, 0.09)
                },
            ],
        }
    }
}

/// Chat bot used by the date planner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifySettings {
    /// Bot API base URL
    pub api_base: String,
    /// Bot token; notifications are disabled when unset
    pub bot_token: Option<String>,
    /// Recipient chat id
    pub chat_id: Option<String>,
}

impl Default for NotifySettings {
    fn default() -> Self {
        Self {
            api_base: constants::notify::DEFAULT_API_BASE.to_string(),
            bot_token: None,
            chat_id: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds counted down before the shutter fires
    pub countdown_seconds: u32,
    /// Milliseconds between the flash and the frame sample
    pub flash_settle_ms: u64,
    /// Mirror the captured still horizontally (selfie mode)
    pub mirror_capture: bool,
    /// Where exported photos are written (default: Pictures/valentine-booth)
    pub export_dir: Option<PathBuf>,
    pub camera: CameraSettings,
    pub decoration: DecorationSettings,
    pub notify: NotifySettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            countdown_seconds: timing::COUNTDOWN_SECONDS,
            flash_settle_ms: timing::FLASH_SETTLE_MS,
            mirror_capture: true, // Default to mirrored (selfie mode)
            export_dir: None,
            camera: CameraSettings::default(),
            decoration: DecorationSettings::default(),
            notify: NotifySettings::default(),
        }
    }
}

impl Config {
    /// Default config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::APP_DIR_NAME).join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is used
    /// when present, otherwise defaults apply. Environment overrides for the
    /// notifier are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from_file(&path)?,
                _ => {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            },
        };

        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let config = Self::parse(&contents, path)?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e: toml::de::Error| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Overlay notifier credentials from the environment
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup(constants::notify::TOKEN_ENV).filter(|v| !v.is_empty()) {
            debug!("Bot token overridden from environment");
            self.notify.bot_token = Some(token);
        }
        if let Some(chat_id) = lookup(constants::notify::CHAT_ID_ENV).filter(|v| !v.is_empty()) {
            self.notify.chat_id = Some(chat_id);
        }
    }

    /// Resolved export directory
    pub fn export_dir(&self) -> PathBuf {
        if let Some(dir) = &self.export_dir {
            return dir.clone();
        }
        dirs::picture_dir()
            .map(|d| d.join(constants::APP_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
