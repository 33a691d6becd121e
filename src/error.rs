//! Custom error types for aead-codec
//!
//! This module defines the error hierarchy for the codec using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for codec operations
#[derive(Error, Debug)]
pub enum CodecError {
    /// Missing or invalid secret material, salt, or KDF/cipher settings.
    /// Fatal at startup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors while reading or writing settings
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// The AEAD primitive refused to encrypt
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// The input is not a well-formed `nonce:tag:ciphertext` envelope
    #[error("Malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Authentication or decoding failed. Carries no detail on purpose.
    #[error("Decryption failed or data is corrupted")]
    DecryptionFailed,
}

impl CodecError {
    /// Create a malformed-envelope error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedEnvelope(reason.into())
    }

    /// Check if this is a configuration error
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Check if this is a malformed-envelope error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedEnvelope(_))
    }

    /// Check if this is the opaque decryption failure
    pub fn is_decryption_failed(&self) -> bool {
        matches!(self, Self::DecryptionFailed)
    }
}

impl From<std::io::Error> for CodecError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CodecError::Config("SECRET_KEY is not set".into());
        assert_eq!(err.to_string(), "Configuration error: SECRET_KEY is not set");
        assert!(err.is_config());
    }

    #[test]
    fn test_malformed_error() {
        let err = CodecError::malformed("expected 3 segments, found 2");
        assert_eq!(
            err.to_string(),
            "Malformed envelope: expected 3 segments, found 2"
        );
        assert!(err.is_malformed());
        assert!(!err.is_decryption_failed());
    }

    #[test]
    fn test_decryption_failed_is_opaque() {
        let err = CodecError::DecryptionFailed;
        assert_eq!(err.to_string(), "Decryption failed or data is corrupted");
        assert!(err.is_decryption_failed());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let codec_err: CodecError = io_err.into();
        assert!(matches!(codec_err, CodecError::Io(_)));
    }
}
