//! Client error types.

use std::io;

use thiserror::Error;

/// Errors surfaced to the chat client's caller.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The relay could not be reached.
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        /// Address the client attempted to reach.
        addr: String,
        /// Underlying socket error.
        source: io::Error,
    },

    /// The session's background task has exited; the connection is gone.
    #[error("session closed")]
    Closed,
}
