//! Saltwire relay server.
//!
//! Forwards opaque encrypted message envelopes between connected chat
//! clients over plain TCP. All encryption and decryption happens on the
//! clients; the relay sees only base64 ciphertext and holds no passphrase,
//! so a compromised relay learns who is connected but not what they say.
//!
//! # Components
//!
//! - [`ConnectionRegistry`]: bookkeeping of live connections and the
//!   encrypted-username envelope each one announced
//! - [`RelayServer`]: accept loop and per-session relay tasks

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod error;
mod registry;
mod relay;

pub use error::RelayError;
pub use registry::{ConnectionRegistry, SessionId};
pub use relay::{RelayConfig, RelayServer};
