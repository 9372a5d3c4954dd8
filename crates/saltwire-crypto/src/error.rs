//! Codec error taxonomy.

use thiserror::Error;

/// Errors returned by [`crate::decrypt`].
///
/// Both variants mean the same thing to a chat client: the line on the wire
/// is unreadable and must be dropped. They are distinguished so callers can
/// log malformed traffic differently from wrong-passphrase traffic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The envelope text is not valid base64 or is too short to contain a
    /// salt and IV.
    #[error("envelope decode failed: {reason}")]
    Decode {
        /// What was wrong with the envelope structure.
        reason: String,
    },

    /// Cryptographic failure: wrong passphrase, corrupted or tampered
    /// ciphertext, bad padding, or a non-UTF-8 result.
    #[error("message unreadable: {reason}")]
    Authentication {
        /// Why the ciphertext could not be opened.
        reason: String,
    },
}
