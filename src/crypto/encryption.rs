//! AES-256-GCM encryption/decryption
//!
//! Provides authenticated encryption of small payloads using AES-256-GCM.
//! Each encryption operation generates a unique nonce. The tag is kept
//! detached so it can travel as its own envelope segment.

use std::fmt;
use std::str::FromStr;

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{AeadInPlace, KeyInit, OsRng},
    Aes256Gcm, Nonce, Tag,
};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CodecError, CodecResult};

use super::envelope::{Envelope, EnvelopeEncoding, NONCE_SIZE};
use super::DerivedKey;

/// AEAD construction used for envelopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Algorithm {
    /// AES with a 256-bit key in Galois/Counter Mode
    #[default]
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aes256Gcm => "aes-256-gcm",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aes-256-gcm" => Ok(Self::Aes256Gcm),
            other => Err(CodecError::Config(format!(
                "Unsupported algorithm: {}",
                other
            ))),
        }
    }
}

// Same case-insensitive parsing as the ALGORITHM variable
impl<'de> Deserialize<'de> for Algorithm {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let identifier = String::deserialize(deserializer)?;
        identifier.parse().map_err(serde::de::Error::custom)
    }
}

/// Encrypt raw bytes into an [`Envelope`]
///
/// Generates a random nonce for each call. No associated data.
pub fn seal(plaintext: &[u8], key: &DerivedKey) -> CodecResult<Envelope> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let mut nonce = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce);

    let mut ciphertext = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(&nonce), b"", &mut ciphertext)
        .map_err(|e| CodecError::Encryption(format!("Encryption failed: {}", e)))?;

    Ok(Envelope {
        nonce,
        tag: tag.into(),
        ciphertext,
    })
}

/// Verify and decrypt an [`Envelope`]
///
/// Any failure, whatever its cause, is [`CodecError::DecryptionFailed`].
pub fn open(envelope: &Envelope, key: &DerivedKey) -> CodecResult<Vec<u8>> {
    let cipher = Aes256Gcm::new(key.as_bytes().into());

    let mut plaintext = envelope.ciphertext.clone();
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(&envelope.nonce),
            b"",
            &mut plaintext,
            Tag::from_slice(&envelope.tag),
        )
        .map_err(|_| CodecError::DecryptionFailed)?;

    Ok(plaintext)
}

/// Encrypt bytes and serialize the envelope with `encoding`
pub fn encrypt_bytes(
    plaintext: &[u8],
    key: &DerivedKey,
    encoding: EnvelopeEncoding,
) -> CodecResult<String> {
    Ok(seal(plaintext, key)?.encode(encoding))
}

/// Parse an envelope serialized with `encoding` and decrypt it
pub fn decrypt_bytes(
    envelope: &str,
    key: &DerivedKey,
    encoding: EnvelopeEncoding,
) -> CodecResult<Vec<u8>> {
    let envelope = Envelope::parse(envelope, encoding)?;
    open(&envelope, key)
}

/// Encrypt a string into a hex `nonce:tag:ciphertext` envelope
pub fn encrypt(plaintext: &str, key: &DerivedKey) -> CodecResult<String> {
    encrypt_bytes(plaintext.as_bytes(), key, EnvelopeEncoding::Hex)
}

/// Decrypt a hex envelope back to a string
pub fn decrypt(envelope: &str, key: &DerivedKey) -> CodecResult<String> {
    decrypt_string(envelope, key, EnvelopeEncoding::Hex)
}

/// Decrypt to a string
///
/// Non-UTF-8 plaintext is reported exactly like a bad tag.
pub fn decrypt_string(
    envelope: &str,
    key: &DerivedKey,
    encoding: EnvelopeEncoding,
) -> CodecResult<String> {
    let plaintext = decrypt_bytes(envelope, key, encoding)?;
    String::from_utf8(plaintext).map_err(|_| CodecError::DecryptionFailed)
}
