//! AES-256-GCM encryption and decryption of credential blobs.
//!
//! **Nonce size:** the envelope format carries a 16-byte IV, so the primitive
//! is instantiated as `AesGcm<Aes256, U16>` rather than the conventional
//! 96-bit-nonce `Aes256Gcm` alias. GCM derives the counter block through
//! GHASH for non-96-bit IVs, so the construction is well-defined, and keeping
//! the 16-byte IV preserves compatibility with envelopes already at rest.
//!
//! Every encryption draws a fresh random IV from the OS CSPRNG. IV reuse
//! under the same key breaks both confidentiality and authentication.

use aes_gcm::{
    aead::{generic_array::typenum::U16, Aead, KeyInit, OsRng},
    aes::Aes256,
    AesGcm, Nonce,
};

use crate::envelope::{Envelope, ENVELOPE_VERSION, IV_LEN, TAG_LEN};
use crate::error::CipherError;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// AES-256-GCM with the envelope's 16-byte nonce size.
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Encrypts and decrypts credential envelopes under a single 256-bit key.
///
/// Holds only the expanded key after construction, so a single instance is
/// safe to share across threads; every call is an independent transform.
// No Debug derive: the struct holds key material.
#[derive(Clone)]
pub struct EnvelopeCipher {
    cipher: Aes256Gcm16,
}

impl EnvelopeCipher {
    /// Construct a cipher from a hex-encoded 256-bit key.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidKeyLength`] if `key_hex` is not valid
    /// hex or does not decode to exactly [`KEY_LEN`] bytes.
    pub fn new(key_hex: &str) -> Result<Self, CipherError> {
        let key = hex::decode(key_hex).map_err(|_| CipherError::InvalidKeyLength)?;
        if key.len() != KEY_LEN {
            return Err(CipherError::InvalidKeyLength);
        }
        let cipher =
            Aes256Gcm16::new_from_slice(&key).map_err(|_| CipherError::InvalidKeyLength)?;
        Ok(Self { cipher })
    }

    /// Encrypt a JSON credential blob into an [`Envelope`].
    ///
    /// A random 16-byte IV is generated per call via the OS CSPRNG. The AEAD
    /// output's trailing 16-byte tag is split into the envelope's `tag`
    /// field; the rest becomes `data`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::AeadFailure`] on an internal AEAD error
    /// (unreachable with a valid key and nonce).
    pub fn encrypt(&self, plaintext: &serde_json::Value) -> Result<Envelope, CipherError> {
        // serde_json::to_vec of a Value cannot fail; any error here is internal.
        let plaintext_bytes =
            serde_json::to_vec(plaintext).map_err(|_| CipherError::AeadFailure)?;

        use aes_gcm::aead::rand_core::RngCore;
        let mut iv = [0u8; IV_LEN];
        OsRng.fill_bytes(&mut iv);
        let nonce = Nonce::<U16>::from_slice(&iv);

        let raw = self
            .cipher
            .encrypt(nonce, plaintext_bytes.as_ref())
            .map_err(|_| CipherError::AeadFailure)?;

        // The aead API appends the tag; the envelope stores it separately.
        let split = raw.len() - TAG_LEN;
        Ok(Envelope {
            data: hex::encode(&raw[..split]),
            iv: hex::encode(iv),
            tag: hex::encode(&raw[split..]),
            version: ENVELOPE_VERSION,
        })
    }

    /// Decrypt an [`Envelope`] back to the JSON credential blob.
    ///
    /// Reassembles `data ++ tag` and runs authenticated decryption; failure
    /// releases no plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::MalformedEnvelope`] if any field fails hex or
    /// length validation, [`CipherError::AuthenticationFailed`] if tag
    /// verification fails (tampered fields or wrong key), and
    /// [`CipherError::InvalidPlaintextEncoding`] if the authenticated
    /// plaintext is not valid UTF-8 JSON.
    pub fn decrypt(&self, envelope: &Envelope) -> Result<serde_json::Value, CipherError> {
        let decoded = envelope.decode_fields()?;

        let mut raw = decoded.data;
        raw.extend_from_slice(&decoded.tag);
        let nonce = Nonce::<U16>::from_slice(&decoded.iv);

        let plaintext = self
            .cipher
            .decrypt(nonce, raw.as_ref())
            .map_err(|_| CipherError::AuthenticationFailed)?;

        serde_json::from_slice(&plaintext).map_err(|_| CipherError::InvalidPlaintextEncoding)
    }
}
