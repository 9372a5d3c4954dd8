//! Chat session on top of the transport.
//!
//! Wraps a [`ConnectedSession`] with the chat conventions: the announce
//! and disconnect notices, and the `"<username>: <text>"` line format.

use std::time::Duration;

use crate::{
    SessionError,
    transport::{self, ConnectedSession, SessionConfig},
};

/// Format an outbound chat line.
pub fn format_message(username: &str, text: &str) -> String {
    format!("{username}: {text}")
}

/// The announcement sent as a session's first frame. The relay stores this
/// envelope as the session's username entry.
pub fn announce_message(username: &str) -> String {
    format!("{username} is Connected")
}

/// The best-effort notice sent on shutdown.
pub fn disconnect_message(username: &str) -> String {
    format!("{username} has Disconnected")
}

/// One client's logical connection: send and receive loops plus the
/// announce/disconnect lifecycle.
pub struct ChatSession {
    username: String,
    transport: ConnectedSession,
}

impl ChatSession {
    /// Connect to the relay and announce.
    pub async fn connect(config: SessionConfig) -> Result<Self, SessionError> {
        let username = config.username.clone();
        let transport = transport::connect(config).await?;

        Ok(Self { username, transport })
    }

    /// Display name this session announced as.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Encrypt and send one chat line as `"<username>: <text>"`.
    ///
    /// Blank input is ignored.
    pub async fn send(&self, text: &str) -> Result<(), SessionError> {
        if text.trim().is_empty() {
            return Ok(());
        }

        self.transport
            .to_server
            .send(format_message(&self.username, text))
            .await
            .map_err(|_| SessionError::Closed)
    }

    /// Next decrypted line from the relay, or `None` once the session is
    /// closed.
    pub async fn recv(&mut self) -> Option<String> {
        self.transport.from_server.recv().await
    }

    /// Send the disconnect notice and close the session.
    ///
    /// Best-effort: the notice is queued and the writer given a short
    /// window to drain before the connection task is stopped. A partially
    /// sent notice on abrupt termination is acceptable.
    pub async fn disconnect(self) {
        let notice = disconnect_message(&self.username);
        let _ = self.transport.to_server.send(notice).await;

        tokio::time::sleep(Duration::from_millis(100)).await;
        self.transport.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_format_matches_wire_convention() {
        assert_eq!(format_message("alice", "hello"), "alice: hello");
    }

    #[test]
    fn lifecycle_notices() {
        assert_eq!(announce_message("alice"), "alice is Connected");
        assert_eq!(disconnect_message("alice"), "alice has Disconnected");
    }
}
