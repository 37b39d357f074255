//! AES-256-GCM credential envelope codec.
//!
//! Plugin credentials are stored as small JSON objects encrypted under a
//! 256-bit key and serialised into a four-field hex envelope:
//!
//! ```json
//! {"data": "<hex>", "iv": "<32 hex chars>", "tag": "<32 hex chars>", "version": 1}
//! ```
//!
//! `data` is the AEAD ciphertext with the trailing 16-byte authentication tag
//! split off into `tag`; `iv` is a fresh 16-byte random nonce per encryption.
//! The `version` field enables future format migration without breaking
//! existing envelopes.
//!
//! This crate is intentionally free of I/O, configuration, and logging
//! dependencies. It provides the low-level encrypt/decrypt operations used by
//! the `credtool` binary and any backend that stores encrypted credentials.

pub mod cipher;
pub mod envelope;
pub mod error;

pub use cipher::EnvelopeCipher;
pub use envelope::Envelope;
pub use error::CipherError;
