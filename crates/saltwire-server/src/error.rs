//! Relay error types.

use std::io;

use thiserror::Error;

/// Errors that abort the relay itself.
///
/// Per-session read/write failures never surface here: they terminate only
/// the affected session, which is cleaned up on its own task. The only
/// globally fatal failure is being unable to bind the listening port.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address the relay attempted to bind.
        addr: String,
        /// Underlying socket error.
        source: io::Error,
    },

    /// The local address of a bound listener could not be read.
    #[error("failed to read local address: {0}")]
    LocalAddr(#[source] io::Error),
}
