//! Errors produced by the envelope codec.

use thiserror::Error;

/// Errors produced by envelope construction, encryption, and decryption.
///
/// All variants are terminal for the operation: retrying a failed decryption
/// with the same inputs cannot succeed, so callers should treat any failure
/// as "credentials unavailable" and handle it at a higher level.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The key hex did not decode to exactly 32 bytes.
    #[error("invalid key length: expected a 64-character hex string (32 bytes)")]
    InvalidKeyLength,

    /// An envelope field is missing, not valid hex, or the wrong length,
    /// or the envelope carries an unsupported version.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(&'static str),

    /// An internal encryption failure — plaintext serialisation or the AEAD
    /// primitive itself. Unreachable with a valid key and nonce, both of
    /// which construction and the IV generator ensure.
    #[error("encryption operation failed")]
    AeadFailure,

    /// Tag verification failed during decryption — tampered `data` or `tag`,
    /// or a key other than the one used to encrypt. No plaintext is released.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The authenticated plaintext is not a valid UTF-8 JSON document.
    /// Indicates an envelope/key mismatch or corruption upstream of
    /// encryption. Decrypt-only: encryption has no payload error path.
    #[error("decrypted payload is not valid UTF-8 JSON")]
    InvalidPlaintextEncoding,
}
