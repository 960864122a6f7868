//! Configuration for the loaders.
//!
//! This module defines the settings that shape an exchange with the controller. It provides:
//! 1. **Defaults:** Baseline link parameters (binding, baud rate, read timeout).
//! 2. **Structures:** [`Config`] and its [`LinkConfig`] section.
//! 3. **Enums:** Link binding kind, acknowledgment policy, and (via [`Panel`]) display geometry.
//!
//! Configuration is read from JSON (`Config::from_json_file`) or built with `Config::default()`;
//! command-line flags override individual fields afterwards.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::ConfigError;
use crate::image::Panel;
use crate::protocol::AckPolicy;

/// Default configuration constants.
mod defaults {
    /// Default serial line speed in bits per second.
    pub const BAUD_RATE: u32 = 115_200;

    /// Default serial read timeout in milliseconds.
    ///
    /// The protocol itself defines no timeout; this only bounds how long a
    /// silent serial device can stall a read.
    pub const TIMEOUT_MS: u64 = 60_000;
}

/// Which binding is used to reach the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    /// Raw character device opened read+write.
    #[default]
    #[serde(alias = "file", alias = "device")]
    DeviceFile,
    /// Serial port with input flush on open.
    Serial,
}

/// Root configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Channel binding settings.
    #[serde(default)]
    pub link: LinkConfig,

    /// How acknowledgment bytes are checked.
    #[serde(default)]
    pub ack_policy: AckPolicy,

    /// Panel the images are meant for; enables a frame-size sanity check on upload.
    #[serde(default)]
    pub panel: Option<Panel>,
}

impl Config {
    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            origin: "inline JSON".to_owned(),
            source,
        })
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when its contents are not a valid configuration.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            origin: path.display().to_string(),
            source,
        })
    }
}

/// Channel binding settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkConfig {
    /// Binding used to open the device path.
    #[serde(default)]
    pub kind: LinkKind,

    /// Serial line speed (ignored by the device-file binding).
    #[serde(default = "LinkConfig::default_baud_rate")]
    pub baud_rate: u32,

    /// Serial read timeout in milliseconds (ignored by the device-file binding).
    #[serde(default = "LinkConfig::default_timeout_ms")]
    pub timeout_ms: u64,
}

impl LinkConfig {
    const fn default_baud_rate() -> u32 {
        defaults::BAUD_RATE
    }

    const fn default_timeout_ms() -> u64 {
        defaults::TIMEOUT_MS
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            kind: LinkKind::default(),
            baud_rate: defaults::BAUD_RATE,
            timeout_ms: defaults::TIMEOUT_MS,
        }
    }
}
