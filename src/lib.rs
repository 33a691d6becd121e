//! aead-codec - passphrase-keyed AES-256-GCM envelopes
//!
//! Derives a 256-bit key from a secret and salt with a memory-hard KDF, then
//! encrypts small payloads into a single transportable string:
//!
//! ```text
//! <nonce-hex>:<tag-hex>:<ciphertext-hex>
//! ```
//!
//! # Architecture
//!
//! - `crypto`: key derivation, AES-256-GCM, envelope wire format
//! - `codec`: the startup-built handle that owns the key
//! - `config`: settings file, environment overrides, secret loading
//! - `error`: custom error types
//! - `logging`: tracing subscriber setup for the binary
//! - `cli`: command handlers for the `aead-codec` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use aead_codec::codec::Codec;
//! use aead_codec::config::{secret_from_value, CodecPaths, CodecSettings};
//!
//! let mut settings = CodecSettings::load_or_default(&CodecPaths::new()?)?;
//! settings.apply_env()?;
//! let secret = secret_from_value(std::env::var("SECRET_KEY").ok())?;
//! let codec = Codec::new(&secret, &settings)?;
//!
//! let envelope = codec.encrypt("Hello, World!")?;
//! assert_eq!(codec.decrypt(&envelope)?, "Hello, World!");
//! ```

pub mod cli;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod logging;

pub use codec::Codec;
pub use error::{CodecError, CodecResult};
