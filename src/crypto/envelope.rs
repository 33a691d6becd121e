//! Envelope wire format
//!
//! An envelope is `<nonce>:<tag>:<ciphertext>`, each segment encoded with the
//! same [`EnvelopeEncoding`]. Lowercase hex is the default; unpadded
//! URL-safe base64 is the compact alternative.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Size of the GCM authentication tag in bytes
pub const TAG_SIZE: usize = 16;

/// Separator between envelope segments
pub const DELIMITER: char = ':';

/// How envelope segments are turned into text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeEncoding {
    /// Lowercase hexadecimal (decoding accepts either case)
    #[default]
    Hex,
    /// URL-safe base64 without padding
    Base64Url,
}

impl EnvelopeEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hex => "hex",
            Self::Base64Url => "base64url",
        }
    }

    fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Hex => hex::encode(bytes),
            Self::Base64Url => URL_SAFE_NO_PAD.encode(bytes),
        }
    }

    fn decode(&self, segment: &str, name: &str) -> CodecResult<Vec<u8>> {
        match self {
            Self::Hex => hex::decode(segment)
                .map_err(|e| CodecError::malformed(format!("{} segment is not hex: {}", name, e))),
            Self::Base64Url => URL_SAFE_NO_PAD.decode(segment).map_err(|e| {
                CodecError::malformed(format!("{} segment is not base64url: {}", name, e))
            }),
        }
    }

    fn decode_fixed<const N: usize>(&self, segment: &str, name: &str) -> CodecResult<[u8; N]> {
        let bytes = self.decode(segment, name)?;
        bytes.try_into().map_err(|bytes: Vec<u8>| {
            CodecError::malformed(format!(
                "{} must be {} bytes, got {}",
                name,
                N,
                bytes.len()
            ))
        })
    }
}

impl fmt::Display for EnvelopeEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnvelopeEncoding {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(Self::Hex),
            "base64url" => Ok(Self::Base64Url),
            other => Err(CodecError::Config(format!(
                "Unknown envelope encoding: {}",
                other
            ))),
        }
    }
}

/// The nonce, tag and ciphertext produced by one encryption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub nonce: [u8; NONCE_SIZE],
    pub tag: [u8; TAG_SIZE],
    pub ciphertext: Vec<u8>,
}

impl Envelope {
    /// Serialize as `<nonce>:<tag>:<ciphertext>`
    pub fn encode(&self, encoding: EnvelopeEncoding) -> String {
        format!(
            "{}{}{}{}{}",
            encoding.encode(&self.nonce),
            DELIMITER,
            encoding.encode(&self.tag),
            DELIMITER,
            encoding.encode(&self.ciphertext)
        )
    }

    /// Parse an envelope string
    ///
    /// Nonce and tag must decode to exactly [`NONCE_SIZE`] and [`TAG_SIZE`]
    /// bytes. The ciphertext segment may be empty (empty plaintext).
    pub fn parse(input: &str, encoding: EnvelopeEncoding) -> CodecResult<Self> {
        let segments: Vec<&str> = input.split(DELIMITER).collect();
        let [nonce, tag, ciphertext] = segments.as_slice() else {
            return Err(CodecError::malformed(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        };

        Ok(Self {
            nonce: encoding.decode_fixed::<NONCE_SIZE>(nonce, "nonce")?,
            tag: encoding.decode_fixed::<TAG_SIZE>(tag, "tag")?,
            ciphertext: encoding.decode(ciphertext, "ciphertext")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Envelope {
        Envelope {
            nonce: [0x01; NONCE_SIZE],
            tag: [0xab; TAG_SIZE],
            ciphertext: vec![0xde, 0xad, 0xbe, 0xef],
        }
    }

    #[test]
    fn test_hex_layout() {
        let encoded = sample().encode(EnvelopeEncoding::Hex);
        assert_eq!(
            encoded,
            "010101010101010101010101:abababababababababababababababab:deadbeef"
        );
        assert_eq!(Envelope::parse(&encoded, EnvelopeEncoding::Hex).unwrap(), sample());
    }

    #[test]
    fn test_base64url_layout() {
        let encoded = sample().encode(EnvelopeEncoding::Base64Url);
        let segments: Vec<&str> = encoded.split(':').collect();
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2], "3q2-7w");
        assert_eq!(
            Envelope::parse(&encoded, EnvelopeEncoding::Base64Url).unwrap(),
            sample()
        );
    }

    #[test]
    fn test_uppercase_hex_accepted() {
        let encoded = sample().encode(EnvelopeEncoding::Hex).to_uppercase();
        assert_eq!(Envelope::parse(&encoded, EnvelopeEncoding::Hex).unwrap(), sample());
    }

    #[test]
    fn test_empty_ciphertext_segment() {
        let envelope = Envelope {
            ciphertext: Vec::new(),
            ..sample()
        };
        let encoded = envelope.encode(EnvelopeEncoding::Hex);
        assert!(encoded.ends_with(':'));
        assert_eq!(Envelope::parse(&encoded, EnvelopeEncoding::Hex).unwrap(), envelope);
    }

    #[test]
    fn test_wrong_segment_count() {
        for input in ["", "abc", "a:b", "a:b:c:d", "::::"] {
            let err = Envelope::parse(input, EnvelopeEncoding::Hex).unwrap_err();
            assert!(err.is_malformed(), "{:?} should be malformed", input);
        }
    }

    #[test]
    fn test_empty_nonce_or_tag() {
        let tag = hex::encode([0u8; TAG_SIZE]);
        let nonce = hex::encode([0u8; NONCE_SIZE]);

        let err = Envelope::parse(&format!(":{}:00", tag), EnvelopeEncoding::Hex).unwrap_err();
        assert!(err.is_malformed());

        let err = Envelope::parse(&format!("{}::00", nonce), EnvelopeEncoding::Hex).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_non_hex_segments() {
        let tag = hex::encode([0u8; TAG_SIZE]);
        let nonce = hex::encode([0u8; NONCE_SIZE]);

        let cases = [
            format!("zz{}:{}:00", &nonce[2..], tag),
            format!("{}:{}:0g", nonce, tag),
            format!("{}:{}:abc", nonce, tag),
        ];
        for input in cases {
            let err = Envelope::parse(&input, EnvelopeEncoding::Hex).unwrap_err();
            assert!(err.is_malformed(), "{:?} should be malformed", input);
        }
    }

    #[test]
    fn test_wrong_field_lengths() {
        let short_nonce = format!("{}:{}:00", hex::encode([0u8; 11]), hex::encode([0u8; TAG_SIZE]));
        let err = Envelope::parse(&short_nonce, EnvelopeEncoding::Hex).unwrap_err();
        assert!(err.to_string().contains("nonce must be 12 bytes, got 11"));

        let long_tag = format!("{}:{}:00", hex::encode([0u8; NONCE_SIZE]), hex::encode([0u8; 17]));
        let err = Envelope::parse(&long_tag, EnvelopeEncoding::Hex).unwrap_err();
        assert!(err.to_string().contains("tag must be 16 bytes, got 17"));
    }

    #[test]
    fn test_surrounding_whitespace_is_malformed() {
        let encoded = format!(" {}\n", sample().encode(EnvelopeEncoding::Hex));
        let err = Envelope::parse(&encoded, EnvelopeEncoding::Hex).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_encoding_from_str() {
        assert_eq!("hex".parse::<EnvelopeEncoding>().unwrap(), EnvelopeEncoding::Hex);
        assert_eq!(
            "Base64URL".parse::<EnvelopeEncoding>().unwrap(),
            EnvelopeEncoding::Base64Url
        );
        assert!("base32".parse::<EnvelopeEncoding>().unwrap_err().is_config());
    }
}
