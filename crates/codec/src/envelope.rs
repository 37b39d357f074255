//! The credential envelope wire type.
//!
//! Envelopes are serialised as JSON objects, typically embedded as a string
//! inside a larger record (e.g. a `credentials` database column). Field order
//! is not significant; field presence and hex validity are.

use serde::{Deserialize, Serialize};

use crate::error::CipherError;

/// Envelope format version written by every encryption.
pub const ENVELOPE_VERSION: u32 = 1;

/// Byte length of the per-encryption random IV (16 bytes = 128 bits).
pub const IV_LEN: usize = 16;

/// Byte length of the GCM authentication tag.
pub const TAG_LEN: usize = 16;

/// A serialised credential envelope.
///
/// Constructed once per encryption and consumed exactly once by a matching
/// decryption holding the same key. No mutation after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Hex-encoded ciphertext (AEAD output minus the trailing tag).
    pub data: String,
    /// Hex-encoded 16-byte nonce, freshly random per encryption.
    pub iv: String,
    /// Hex-encoded 16-byte authentication tag.
    pub tag: String,
    /// Envelope format version, fixed at [`ENVELOPE_VERSION`].
    pub version: u32,
}

/// Raw binary fields recovered from a validated [`Envelope`].
#[derive(Debug)]
pub struct DecodedEnvelope {
    /// Ciphertext bytes, tag excluded.
    pub data: Vec<u8>,
    /// Nonce bytes.
    pub iv: [u8; IV_LEN],
    /// Authentication tag bytes.
    pub tag: [u8; TAG_LEN],
}

impl Envelope {
    /// Parse an envelope from its JSON string representation.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::MalformedEnvelope`] if the string is not a JSON
    /// object with the expected fields.
    pub fn from_json_str(s: &str) -> Result<Self, CipherError> {
        serde_json::from_str(s).map_err(|_| CipherError::MalformedEnvelope("invalid envelope JSON"))
    }

    /// Hex-decode and validate all three binary fields.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::MalformedEnvelope`] if the version is
    /// unsupported, any field is not valid hex, or `iv`/`tag` are not exactly
    /// 16 bytes each.
    pub fn decode_fields(&self) -> Result<DecodedEnvelope, CipherError> {
        if self.version != ENVELOPE_VERSION {
            return Err(CipherError::MalformedEnvelope("unsupported version"));
        }

        let data = hex::decode(&self.data)
            .map_err(|_| CipherError::MalformedEnvelope("data is not valid hex"))?;

        let iv_bytes = hex::decode(&self.iv)
            .map_err(|_| CipherError::MalformedEnvelope("iv is not valid hex"))?;
        let iv: [u8; IV_LEN] = iv_bytes
            .try_into()
            .map_err(|_| CipherError::MalformedEnvelope("iv must be 16 bytes"))?;

        let tag_bytes = hex::decode(&self.tag)
            .map_err(|_| CipherError::MalformedEnvelope("tag is not valid hex"))?;
        let tag: [u8; TAG_LEN] = tag_bytes
            .try_into()
            .map_err(|_| CipherError::MalformedEnvelope("tag must be 16 bytes"))?;

        Ok(DecodedEnvelope { data, iv, tag })
    }
}
