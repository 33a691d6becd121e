//! Key derivation from a passphrase and salt
//!
//! Derives the 32-byte AES-256 key with a memory-hard KDF. scrypt is the
//! default because its parameters match the envelopes already in circulation;
//! Argon2id is available for deployments that start fresh.

use std::fmt;

use argon2::{Argon2, Params};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::error::{CodecError, CodecResult};

/// AES-256 key length in bytes
pub const KEY_SIZE: usize = 32;

/// Argon2 rejects salts shorter than this
const ARGON2_MIN_SALT_LEN: usize = 8;

/// Upper bound on the working memory a KDF may ask for (1 GiB)
pub const MAX_KDF_MEMORY: u64 = 1 << 30;

/// Parameters for key derivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum KdfParams {
    /// scrypt with cost N = 2^log_n
    Scrypt {
        /// log2 of the CPU/memory cost (default: 14, N = 16384)
        #[serde(default = "default_scrypt_log_n")]
        log_n: u8,
        /// Block size (default: 8)
        #[serde(default = "default_scrypt_r")]
        r: u32,
        /// Parallelization (default: 1)
        #[serde(default = "default_scrypt_p")]
        p: u32,
    },
    /// Argon2id, version 0x13
    Argon2id {
        /// Memory cost in KiB (default: 65536 = 64 MiB)
        #[serde(default = "default_argon2_memory_cost")]
        memory_cost: u32,
        /// Time cost (iterations, default: 3)
        #[serde(default = "default_argon2_time_cost")]
        time_cost: u32,
        /// Parallelism degree (default: 4)
        #[serde(default = "default_argon2_parallelism")]
        parallelism: u32,
    },
}

fn default_scrypt_log_n() -> u8 {
    14
}

fn default_scrypt_r() -> u32 {
    8
}

fn default_scrypt_p() -> u32 {
    1
}

fn default_argon2_memory_cost() -> u32 {
    65536
}

fn default_argon2_time_cost() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

impl Default for KdfParams {
    fn default() -> Self {
        Self::scrypt()
    }
}

impl KdfParams {
    /// scrypt with N = 16384, r = 8, p = 1
    pub fn scrypt() -> Self {
        Self::Scrypt {
            log_n: default_scrypt_log_n(),
            r: default_scrypt_r(),
            p: default_scrypt_p(),
        }
    }

    /// Argon2id with 64 MiB, 3 iterations, 4 lanes
    pub fn argon2id() -> Self {
        Self::Argon2id {
            memory_cost: default_argon2_memory_cost(),
            time_cost: default_argon2_time_cost(),
            parallelism: default_argon2_parallelism(),
        }
    }

    /// Short name for logs and status output
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scrypt { .. } => "scrypt",
            Self::Argon2id { .. } => "argon2id",
        }
    }

    /// Bytes of working memory a derivation needs, `None` if it overflows
    ///
    /// scrypt needs `128 * r * N`; Argon2id needs `memory_cost` KiB.
    pub fn memory_bytes(&self) -> Option<u64> {
        match *self {
            Self::Scrypt { log_n, r, .. } => 1u64
                .checked_shl(u32::from(log_n))
                .and_then(|n| n.checked_mul(128))
                .and_then(|n| n.checked_mul(u64::from(r))),
            Self::Argon2id { memory_cost, .. } => u64::from(memory_cost).checked_mul(1024),
        }
    }

    /// Reject costs that would exhaust memory instead of failing cleanly
    fn check_memory(&self) -> CodecResult<()> {
        match self.memory_bytes() {
            Some(bytes) if bytes <= MAX_KDF_MEMORY => Ok(()),
            Some(bytes) => Err(CodecError::Config(format!(
                "{} parameters need {} bytes of memory, limit is {}",
                self.name(),
                bytes,
                MAX_KDF_MEMORY
            ))),
            None => Err(CodecError::Config(format!(
                "{} parameters overflow the memory limit of {} bytes",
                self.name(),
                MAX_KDF_MEMORY
            ))),
        }
    }
}

/// A derived encryption key
///
/// Immutable once built and zeroed on drop.
pub struct DerivedKey {
    key: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Wrap raw key material obtained elsewhere
    pub fn from_bytes(key: [u8; KEY_SIZE]) -> Self {
        Self { key }
    }

    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.key
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DerivedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Derive an encryption key from a secret and salt
///
/// This is deliberately slow. Call it once at startup and keep the key.
pub fn derive_key(secret: &[u8], salt: &[u8], params: &KdfParams) -> CodecResult<DerivedKey> {
    if secret.is_empty() {
        return Err(CodecError::Config(
            "secret is empty; refusing to derive a key".to_string(),
        ));
    }
    if salt.is_empty() {
        return Err(CodecError::Config(
            "salt is empty; refusing to derive a key".to_string(),
        ));
    }

    params.check_memory()?;

    let mut key = [0u8; KEY_SIZE];

    match *params {
        KdfParams::Scrypt { log_n, r, p } => {
            let scrypt_params = scrypt::Params::new(log_n, r, p, KEY_SIZE)
                .map_err(|e| CodecError::Config(format!("Invalid scrypt parameters: {}", e)))?;

            scrypt::scrypt(secret, salt, &scrypt_params, &mut key)
                .map_err(|e| CodecError::Config(format!("Key derivation failed: {}", e)))?;
        }
        KdfParams::Argon2id {
            memory_cost,
            time_cost,
            parallelism,
        } => {
            if salt.len() < ARGON2_MIN_SALT_LEN {
                return Err(CodecError::Config(format!(
                    "Argon2id needs a salt of at least {} bytes, got {}",
                    ARGON2_MIN_SALT_LEN,
                    salt.len()
                )));
            }

            let argon2_params = Params::new(memory_cost, time_cost, parallelism, Some(KEY_SIZE))
                .map_err(|e| CodecError::Config(format!("Invalid Argon2 parameters: {}", e)))?;

            let argon2 = Argon2::new(
                argon2::Algorithm::Argon2id,
                argon2::Version::V0x13,
                argon2_params,
            );

            argon2
                .hash_password_into(secret, salt, &mut key)
                .map_err(|e| CodecError::Config(format!("Key derivation failed: {}", e)))?;
        }
    }

    let derived = DerivedKey { key };
    key.zeroize();
    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Cheap Argon2id params so the tests stay fast
    fn fast_argon2() -> KdfParams {
        KdfParams::Argon2id {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn test_derive_key() {
        let key = derive_key(b"correct-secret", b"pepper", &KdfParams::scrypt()).unwrap();
        assert_eq!(key.as_bytes().len(), KEY_SIZE);
    }

    #[test]
    fn test_same_inputs_same_key() {
        let params = KdfParams::scrypt();
        let key1 = derive_key(b"correct-secret", b"pepper", &params).unwrap();
        let key2 = derive_key(b"correct-secret", b"pepper", &params).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_secret_different_key() {
        let params = KdfParams::scrypt();
        let key1 = derive_key(b"secret-one", b"pepper", &params).unwrap();
        let key2 = derive_key(b"secret-two", b"pepper", &params).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let params = KdfParams::scrypt();
        let key1 = derive_key(b"correct-secret", b"pepper", &params).unwrap();
        let key2 = derive_key(b"correct-secret", b"paprika", &params).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_scrypt_matches_rfc7914_vector() {
        // RFC 7914 section 12, second vector, truncated to 32 bytes
        let params = KdfParams::Scrypt {
            log_n: 10,
            r: 8,
            p: 16,
        };
        let key = derive_key(b"password", b"NaCl", &params).unwrap();
        assert_eq!(
            hex::encode(key.as_bytes()),
            "fdbabe1c9d3472007856e7190d01e9fe7c6ad7cbc8237830e77376634b373162"
        );
    }

    #[test]
    fn test_empty_secret_is_config_error() {
        let err = derive_key(b"", b"pepper", &KdfParams::scrypt()).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_empty_salt_is_config_error() {
        let err = derive_key(b"correct-secret", b"", &KdfParams::scrypt()).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_invalid_scrypt_params() {
        let params = KdfParams::Scrypt {
            log_n: 14,
            r: 0,
            p: 1,
        };
        let err = derive_key(b"correct-secret", b"pepper", &params).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_oversized_scrypt_params() {
        let params = KdfParams::Scrypt {
            log_n: 40,
            r: 8,
            p: 1,
        };
        let err = derive_key(b"correct-secret", b"pepper", &params).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("memory"));

        let params = KdfParams::Scrypt {
            log_n: 200,
            r: 8,
            p: 1,
        };
        assert_eq!(params.memory_bytes(), None);
        assert!(derive_key(b"correct-secret", b"pepper", &params)
            .unwrap_err()
            .is_config());
    }

    #[test]
    fn test_oversized_argon2_params() {
        let params = KdfParams::Argon2id {
            memory_cost: u32::MAX,
            time_cost: 3,
            parallelism: 4,
        };
        let err = derive_key(b"correct-secret", b"pepper-and-salt", &params).unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("memory"));
    }

    #[test]
    fn test_default_params_within_memory_limit() {
        assert_eq!(KdfParams::scrypt().memory_bytes(), Some(16 * 1024 * 1024));
        assert_eq!(KdfParams::argon2id().memory_bytes(), Some(64 * 1024 * 1024));
        assert!(KdfParams::scrypt().check_memory().is_ok());
        assert!(KdfParams::argon2id().check_memory().is_ok());
    }

    #[test]
    fn test_argon2id_derivation() {
        let params = fast_argon2();
        let key1 = derive_key(b"correct-secret", b"pepper-and-salt", &params).unwrap();
        let key2 = derive_key(b"correct-secret", b"pepper-and-salt", &params).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());

        let scrypt_key =
            derive_key(b"correct-secret", b"pepper-and-salt", &KdfParams::scrypt()).unwrap();
        assert_ne!(key1.as_bytes(), scrypt_key.as_bytes());
    }

    #[test]
    fn test_argon2id_short_salt_rejected() {
        let err = derive_key(b"correct-secret", b"pepper", &fast_argon2()).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_params_serde() {
        let json = r#"{"algorithm":"scrypt"}"#;
        let params: KdfParams = serde_json::from_str(json).unwrap();
        assert_eq!(params, KdfParams::scrypt());

        let json = r#"{"algorithm":"argon2id","memory_cost":1024}"#;
        let params: KdfParams = serde_json::from_str(json).unwrap();
        assert_eq!(
            params,
            KdfParams::Argon2id {
                memory_cost: 1024,
                time_cost: 3,
                parallelism: 4,
            }
        );
        assert_eq!(params.name(), "argon2id");
    }

    #[test]
    fn test_key_debug_redacted() {
        let key = DerivedKey::from_bytes([7u8; KEY_SIZE]);
        let debug = format!("{:?}", key);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains('7'));
    }
}
