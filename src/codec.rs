//! The codec handle
//!
//! A [`Codec`] owns the derived key together with the cipher and wire
//! encoding it is used with. Build one at startup, then share it by
//! reference or behind an `Arc`; it is immutable and safe to use from many
//! threads at once.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::settings::{CodecSettings, DEFAULT_SALT};
use crate::crypto::{encryption, Algorithm, DerivedKey, EnvelopeEncoding, SecretString};
use crate::error::{CodecError, CodecResult};

/// Derived key plus the parameters envelopes are produced with
#[derive(Debug)]
pub struct Codec {
    key: DerivedKey,
    algorithm: Algorithm,
    encoding: EnvelopeEncoding,
}

impl Codec {
    /// Derive the key from `secret` and build the codec
    ///
    /// This runs the KDF and blocks for as long as its cost parameters
    /// demand. Errors are configuration errors and should stop startup.
    pub fn new(secret: &SecretString, settings: &CodecSettings) -> CodecResult<Self> {
        if secret.is_empty() {
            return Err(CodecError::Config("secret is empty".to_string()));
        }

        if settings.uses_default_salt() {
            warn!(
                salt = DEFAULT_SALT,
                "No salt configured; falling back to the built-in default salt. \
                 Key strength now rests on the secret alone"
            );
        }

        info!(
            kdf = settings.kdf.name(),
            algorithm = %settings.algorithm,
            encoding = %settings.encoding,
            "Deriving encryption key"
        );
        let started = Instant::now();
        let key = crate::crypto::derive_key(
            secret.expose_bytes(),
            settings.effective_salt(),
            &settings.kdf,
        )?;
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, "Key derived");

        Ok(Self::from_key(key, settings.algorithm, settings.encoding))
    }

    /// Build a codec around an existing key
    pub fn from_key(key: DerivedKey, algorithm: Algorithm, encoding: EnvelopeEncoding) -> Self {
        Self {
            key,
            algorithm,
            encoding,
        }
    }

    pub fn encoding(&self) -> EnvelopeEncoding {
        self.encoding
    }

    /// Encrypt a string into an envelope
    pub fn encrypt(&self, plaintext: &str) -> CodecResult<String> {
        self.encrypt_bytes(plaintext.as_bytes())
    }

    /// Encrypt raw bytes into an envelope
    pub fn encrypt_bytes(&self, plaintext: &[u8]) -> CodecResult<String> {
        match self.algorithm {
            Algorithm::Aes256Gcm => encryption::encrypt_bytes(plaintext, &self.key, self.encoding),
        }
    }

    /// Decrypt an envelope back to a string
    pub fn decrypt(&self, envelope: &str) -> CodecResult<String> {
        let result = match self.algorithm {
            Algorithm::Aes256Gcm => encryption::decrypt_string(envelope, &self.key, self.encoding),
        };
        result.map_err(log_rejection)
    }

    /// Decrypt an envelope to raw bytes
    pub fn decrypt_bytes(&self, envelope: &str) -> CodecResult<Vec<u8>> {
        let result = match self.algorithm {
            Algorithm::Aes256Gcm => encryption::decrypt_bytes(envelope, &self.key, self.encoding),
        };
        result.map_err(log_rejection)
    }
}

/// Only structural defects are worth describing; auth failures stay opaque
fn log_rejection(err: CodecError) -> CodecError {
    match &err {
        CodecError::MalformedEnvelope(reason) => debug!(%reason, "Malformed envelope"),
        _ => debug!("Envelope rejected"),
    }
    err
}
