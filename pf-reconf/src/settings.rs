//! Application settings

use std::path::{Path, PathBuf};

use pf_config::StalePolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default location of the packet-forwarder configuration
pub const DEFAULT_PF_CONFIG: &str = "/etc/lora-packet-forwarder/global_conf.json";

/// Default packet-forwarder restart command
pub const DEFAULT_RESTART_COMMAND: &str = "/etc/init.d/lora-packet-forwarder restart";

/// Errors loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Failed to read the settings file
    #[error("failed to read settings {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid
    #[error("failed to parse settings {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Packet-forwarder configuration file to merge into
    pub packet_forwarder_config: PathBuf,
    /// Command restarting the packet-forwarder, split on whitespace
    pub restart_command: String,
    /// Handling of channel and radio entries beyond the new plan
    pub stale_entries: StalePolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            packet_forwarder_config: PathBuf::from(DEFAULT_PF_CONFIG),
            restart_command: DEFAULT_RESTART_COMMAND.to_string(),
            stale_entries: StalePolicy::Keep,
        }
    }
}

impl Settings {
    /// Get the XDG config directory for pf-reconf
    /// Uses $XDG_CONFIG_HOME/pf-reconf on Linux/macOS, falls back to ~/.config/pf-reconf
    fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("pf-reconf"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("pf-reconf"))
    }

    /// Get the default settings file path
    pub fn settings_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// used and a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::load_from(path),
            None => match Self::settings_path() {
                Some(path) if path.exists() => Self::load_from(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// Load settings from a file
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        let text = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
