//! Path management for aead-codec
//!
//! Resolves where the settings file lives.
//!
//! ## Path Resolution Order
//!
//! 1. `AEAD_CODEC_CONFIG` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/aead-codec/config.json` or `~/.config/aead-codec/config.json`
//! 3. Windows: `%APPDATA%\aead-codec\config.json`

use std::path::{Path, PathBuf};

use crate::error::CodecError;

/// Environment variable that points at an explicit settings file
pub const CONFIG_PATH_ENV: &str = "AEAD_CODEC_CONFIG";

const APP_DIR: &str = "aead-codec";
const SETTINGS_FILE: &str = "config.json";

/// Location of the codec settings file
#[derive(Debug, Clone)]
pub struct CodecPaths {
    settings_file: PathBuf,
}

impl CodecPaths {
    /// Resolve the settings file from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no override is set and the home directory cannot
    /// be determined.
    pub fn new() -> Result<Self, CodecError> {
        let settings_file = match std::env::var(CONFIG_PATH_ENV) {
            Ok(custom) if !custom.is_empty() => PathBuf::from(custom),
            _ => resolve_default_dir()?.join(SETTINGS_FILE),
        };

        Ok(Self { settings_file })
    }

    /// Use an explicit settings file (CLI flag, tests)
    pub fn with_settings_file(settings_file: impl Into<PathBuf>) -> Self {
        Self {
            settings_file: settings_file.into(),
        }
    }

    /// Path to the settings file
    pub fn settings_file(&self) -> &Path {
        &self.settings_file
    }

    /// Whether a settings file has been written
    pub fn is_initialized(&self) -> bool {
        self.settings_file.exists()
    }
}

/// Resolve the default config directory based on platform
#[cfg(not(windows))]
fn resolve_default_dir() -> Result<PathBuf, CodecError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) if !xdg.is_empty() => PathBuf::from(xdg),
        _ => {
            let home = std::env::var("HOME").map_err(|_| {
                CodecError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join(APP_DIR))
}

/// Resolve the default config directory based on platform
#[cfg(windows)]
fn resolve_default_dir() -> Result<PathBuf, CodecError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| CodecError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join(APP_DIR))
}
