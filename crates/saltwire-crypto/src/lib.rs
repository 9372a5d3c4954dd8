//! Saltwire Cryptographic Envelope Codec
//!
//! Stateless functions that turn a plaintext chat line into a self-contained
//! opaque envelope under a shared passphrase, and back. The relay server
//! forwards envelopes without ever holding the passphrase.
//!
//! # Envelope Format
//!
//! ```text
//! Passphrase + fresh 16-byte salt
//!        │
//!        ▼
//! PBKDF2-HMAC-SHA256 (1000 rounds) → 256-bit key
//!        │
//!        ▼
//! AES-256-CBC + PKCS#7 (fresh 16-byte IV) → ciphertext
//!        │
//!        ▼
//! base64(salt ‖ iv ‖ ciphertext) → envelope text
//! ```
//!
//! Salt and IV are sampled independently per call, so encrypting the same
//! plaintext twice yields different envelopes. The derived key is never
//! stored; it is recomputed on every call and zeroized afterwards.
//!
//! # Security
//!
//! This scheme is encrypt-only: there is no MAC and no AEAD tag. Tampered
//! ciphertext is not detected and may decrypt to garbage or fail unpadding.
//! A successful decrypt is NOT proof of integrity. Callers must treat
//! [`CodecError::Authentication`] as "message unreadable" and drop the
//! message, never as a fatal error.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod envelope;
mod error;

pub use envelope::{
    ENVELOPE_HEADER_SIZE, IV_SIZE, KEY_SIZE, PBKDF2_ROUNDS, SALT_SIZE, decrypt, encrypt,
    encrypt_with_params,
};
pub use error::CodecError;
