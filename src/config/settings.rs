//! Codec settings
//!
//! Non-secret parameters (salt, cipher, wire encoding, KDF cost) live in a
//! JSON settings file. `SALT` and `ALGORITHM` from the environment override
//! the file. The secret itself never touches this file.

use aes_gcm::aead::{rand_core::RngCore, OsRng};
use serde::{Deserialize, Serialize};

use super::file_io::{read_json, write_json_atomic};
use super::paths::CodecPaths;
use crate::crypto::{Algorithm, EnvelopeEncoding, KdfParams};
use crate::error::CodecError;

/// Environment variable holding the salt
pub const SALT_ENV: &str = "SALT";

/// Environment variable holding the algorithm identifier
pub const ALGORITHM_ENV: &str = "ALGORITHM";

/// Salt used when none is configured.
///
/// Widely known, so it adds nothing to the secret's entropy. Only kept so
/// envelopes written without a salt stay readable.
pub const DEFAULT_SALT: &str = "salt";

/// Newest settings layout this build understands
pub const SCHEMA_VERSION: u32 = 1;

/// Random bytes in a generated salt
const GENERATED_SALT_LEN: usize = 16;

/// Settings for building a [`Codec`](crate::codec::Codec)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecSettings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Salt for key derivation; must match across interoperating payloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salt: Option<String>,

    /// AEAD construction
    #[serde(default)]
    pub algorithm: Algorithm,

    /// Text encoding of envelope segments
    #[serde(default)]
    pub encoding: EnvelopeEncoding,

    /// Key derivation function and cost
    #[serde(default)]
    pub kdf: KdfParams,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            salt: None,
            algorithm: Algorithm::default(),
            encoding: EnvelopeEncoding::default(),
            kdf: KdfParams::default(),
        }
    }
}

impl CodecSettings {
    /// Settings with a freshly generated random salt
    pub fn with_random_salt() -> Self {
        Self {
            salt: Some(generate_salt()),
            ..Default::default()
        }
    }

    /// Load settings from disk, or defaults if the file doesn't exist
    ///
    /// Files written by a newer release are refused rather than half-read.
    pub fn load_or_default(paths: &CodecPaths) -> Result<Self, CodecError> {
        let settings: Self = read_json(paths.settings_file())?;
        if settings.schema_version > SCHEMA_VERSION {
            return Err(CodecError::Config(format!(
                "{} uses settings schema {}, this build supports up to {}",
                paths.settings_file().display(),
                settings.schema_version,
                SCHEMA_VERSION
            )));
        }
        Ok(settings)
    }

    /// Defaults plus `SALT` / `ALGORITHM`, for when no settings file can be located
    pub fn from_env() -> Result<Self, CodecError> {
        let mut settings = Self::default();
        settings.apply_env()?;
        Ok(settings)
    }

    /// Save settings to disk
    pub fn save(&self, paths: &CodecPaths) -> Result<(), CodecError> {
        write_json_atomic(paths.settings_file(), self)
    }

    /// Apply `SALT` / `ALGORITHM` from the process environment
    pub fn apply_env(&mut self) -> Result<(), CodecError> {
        self.apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), CodecError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(salt) = lookup(SALT_ENV).filter(|s| !s.is_empty()) {
            self.salt = Some(salt);
        }
        if let Some(algorithm) = lookup(ALGORITHM_ENV).filter(|s| !s.is_empty()) {
            self.algorithm = algorithm.parse()?;
        }
        Ok(())
    }

    /// Whether key derivation will fall back to [`DEFAULT_SALT`]
    pub fn uses_default_salt(&self) -> bool {
        self.salt.as_deref().map_or(true, str::is_empty)
    }

    /// Salt bytes handed to the key deriver
    pub fn effective_salt(&self) -> &[u8] {
        match self.salt.as_deref() {
            Some(salt) if !salt.is_empty() => salt.as_bytes(),
            _ => DEFAULT_SALT.as_bytes(),
        }
    }
}

/// Generate a random hex salt
pub fn generate_salt() -> String {
    let mut bytes = [0u8; GENERATED_SALT_LEN];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
