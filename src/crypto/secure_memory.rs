//! Secure memory handling for secret material
//!
//! Wraps passphrases in a type that zeroes its buffer on drop and never
//! prints its contents.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A passphrase that zeros its contents on drop
///
/// `Debug` and `Display` only reveal the length.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretString {
    inner: String,
}

impl SecretString {
    /// Wrap a secret
    pub fn new(s: impl Into<String>) -> Self {
        Self { inner: s.into() }
    }

    /// Expose the raw bytes for key derivation
    pub fn expose_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// Don't print the contents in Debug output
impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretString")
            .field("len", &self.inner.len())
            .finish()
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED {} bytes]", self.inner.len())
    }
}
