//! TOML configuration for a VMC96 board.
//!
//! Every field has a default, so an empty or partial file is valid and a
//! missing file simply yields [`DeviceConfig::default`]:
//!
//! ```toml
//! [device]
//! inverted_array = false
//!
//! [polling]
//! max_attempts = 100
//! delay_ms = 10
//! broadcast_max_attempts = 10
//! broadcast_delay_ms = 300
//! ```
//!
//! The serial device itself is opened by the caller; nothing here names a
//! port or baud rate.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::executor::{
    PollPolicy, DEFAULT_BROADCAST_DELAY, DEFAULT_BROADCAST_MAX_ATTEMPTS, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_POLL_DELAY,
};

/// Failures reading or writing a board config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `path` could not be read, written, or have its directory created.
    #[error("cannot access board config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or a field has the wrong type.
    #[error("invalid board config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The in-memory settings could not be rendered as TOML.
    #[error("cannot render board config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level board configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeviceConfig {
    #[serde(default)]
    pub device: BoardConfig,
    #[serde(default)]
    pub polling: PollingConfig,
}

/// Wiring options of the board.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BoardConfig {
    /// Motor grid is mirrored; motor ids are nibble-swapped before sending.
    #[serde(default)]
    pub inverted_array: bool,
}

/// Response polling settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollingConfig {
    /// Read attempts per command before the response is treated as missing.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Milliseconds to wait before each read attempt.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    /// Read attempts for a broadcast command.
    #[serde(default = "default_broadcast_max_attempts")]
    pub broadcast_max_attempts: u32,
    /// Milliseconds to wait before each broadcast read, long enough for
    /// every controller on the bus to answer.
    #[serde(default = "default_broadcast_delay_ms")]
    pub broadcast_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
fn default_delay_ms() -> u64 {
    DEFAULT_POLL_DELAY.as_millis() as u64
}
fn default_broadcast_max_attempts() -> u32 {
    DEFAULT_BROADCAST_MAX_ATTEMPTS
}
fn default_broadcast_delay_ms() -> u64 {
    DEFAULT_BROADCAST_DELAY.as_millis() as u64
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_delay_ms(),
            broadcast_max_attempts: default_broadcast_max_attempts(),
            broadcast_delay_ms: default_broadcast_delay_ms(),
        }
    }
}

impl PollingConfig {
    /// The executor policy these settings describe.
    pub fn policy(&self) -> PollPolicy {
        PollPolicy::new(self.max_attempts, Duration::from_millis(self.delay_ms))
    }

    /// The executor policy for broadcast commands.
    pub fn broadcast_policy(&self) -> PollPolicy {
        PollPolicy::new(
            self.broadcast_max_attempts,
            Duration::from_millis(self.broadcast_delay_ms),
        )
    }
}

// ── Loading and saving ────────────────────────────────────────────────────────

impl DeviceConfig {
    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the TOML is malformed.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Renders the config as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Serialize`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Loads a config from `path`, returning the defaults if the file does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] for file-system errors other than "not
    /// found", and [`ConfigError::Parse`] if the TOML is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml_str(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Writes the config to `path`, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] for file-system failures or
    /// [`ConfigError::Serialize`] if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let content = self.to_toml_string()?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
