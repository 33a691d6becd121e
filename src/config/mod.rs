//! Configuration module for aead-codec
//!
//! This module provides configuration management including:
//! - Settings file path resolution
//! - Codec settings persistence and environment overrides
//! - Secret loading

pub mod file_io;
pub mod paths;
pub mod settings;

pub use paths::CodecPaths;
pub use settings::CodecSettings;

use crate::crypto::SecretString;
use crate::error::CodecError;

/// Environment variable holding the secret passphrase
pub const SECRET_ENV: &str = "SECRET_KEY";

/// Validate the secret read from `--secret` / `SECRET_KEY`
///
/// A missing or empty secret is a configuration error; there is no default.
pub fn secret_from_value(value: Option<String>) -> Result<SecretString, CodecError> {
    match value {
        Some(secret) if !secret.is_empty() => Ok(SecretString::new(secret)),
        _ => Err(CodecError::Config(format!("{} is not set", SECRET_ENV))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_present() {
        let secret = secret_from_value(Some("correct-secret".into())).unwrap();
        assert_eq!(secret.expose_bytes(), b"correct-secret");
    }

    #[test]
    fn test_secret_missing_or_empty() {
        assert!(secret_from_value(None).unwrap_err().is_config());
        assert!(secret_from_value(Some(String::new())).unwrap_err().is_config());
    }
}
