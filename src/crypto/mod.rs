//! Cryptographic functions for aead-codec
//!
//! Provides AES-256-GCM envelope encryption with scrypt (or Argon2id)
//! key derivation.

pub mod encryption;
pub mod envelope;
pub mod key_derivation;
pub mod secure_memory;

pub use encryption::{
    decrypt, decrypt_bytes, decrypt_string, encrypt, encrypt_bytes, open, seal, Algorithm,
};
pub use envelope::{Envelope, EnvelopeEncoding, NONCE_SIZE, TAG_SIZE};
pub use key_derivation::{derive_key, DerivedKey, KdfParams, KEY_SIZE};
pub use secure_memory::SecretString;
