//! Configuration file handling for goo.
//!
//! The config lives in `config.toml` under the platform config directory.
//! A missing file means defaults; every field is optional.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use goo_core::{Rgba, Variant};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const CONFIG_FILE: &str = "config.toml";

/// Errors that can occur while loading or saving the config.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No home directory to derive the config location from.
    #[error("could not determine the config directory")]
    NoConfigDir,

    /// Reading or writing the file failed.
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid TOML for [`Config`].
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The config could not be encoded.
    #[error("failed to encode config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Project directories used for config, logs and exports.
pub fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "goo")
}

/// User configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Animation preset.
    pub variant: Variant,
    /// Terminal background as 8-bit RGB.
    pub background: [u8; 3],
    /// Target frame period in milliseconds.
    pub frame_interval_ms: u64,
    /// Force the soft mask on or off; `None` follows the variant.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_mask: Option<bool>,
    /// Fixed random seed; `None` seeds from the clock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Override of the drift speed per millisecond.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Override of the size decay per millisecond.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decay: Option<f64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variant: Variant::default(),
            background: [12, 12, 16],
            frame_interval_ms: 16,
            show_mask: None,
            seed: None,
            speed: None,
            decay: None,
        }
    }
}

impl Config {
    /// Default location of the config file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        project_dirs()
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .ok_or(ConfigError::NoConfigDir)
    }

    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, falling back to defaults if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), variant = %config.variant, "loaded config");
        Ok(config.normalized())
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let text = toml::to_string_pretty(self)?;
        fs::write(path, text).map_err(io_err)?;
        debug!(path = %path.display(), "saved config");
        Ok(())
    }

    /// Background as a color.
    pub fn background_color(&self) -> Rgba {
        Rgba::from_rgb8(self.background)
    }

    /// Whether the mask is drawn, honoring the override.
    pub fn mask_enabled(&self) -> bool {
        self.show_mask.unwrap_or_else(|| self.variant.masked())
    }

    /// Flip the mask. An override matching the variant's default is cleared.
    pub fn toggle_mask(&mut self) {
        let show = !self.mask_enabled();
        self.show_mask = (show != self.variant.masked()).then_some(show);
    }

    /// Switch to the next variant, which brings back its default mask.
    pub fn cycle_variant(&mut self) {
        self.variant = self.variant.next();
        self.show_mask = None;
    }

    fn normalized(mut self) -> Self {
        self.frame_interval_ms = self.frame_interval_ms.max(1);
        self
    }
}
