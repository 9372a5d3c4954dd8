//! Saltwire chat client.
//!
//! Owns one connection to the relay: outgoing text is encrypted with the
//! session passphrase before it touches the socket, and every inbound line
//! is decrypted before it is handed to the display layer. Lines that fail
//! to decode are logged and skipped; lines that fail decryption (wrong
//! passphrase, corrupted ciphertext) are silently dropped, never shown as
//! garbage.
//!
//! # Components
//!
//! - [`transport`]: TCP I/O bridged to channels, one background task
//! - [`ChatSession`]: announce/send/receive/disconnect on top of it

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod session;
pub mod transport;

pub use error::SessionError;
pub use session::{ChatSession, announce_message, disconnect_message, format_message};
pub use transport::{ConnectedSession, SessionConfig};
