//! TCP transport for a chat session.
//!
//! [`connect`] returns a [`ConnectedSession`] with a channel pair; an
//! internal task bridges the channels to the socket, encrypting outbound
//! text and decrypting inbound lines. Protocol text stays plaintext on the
//! channel side, ciphertext on the socket side.

use saltwire_crypto::CodecError;
use tokio::{
    io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{
        TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::mpsc,
};

use crate::{SessionError, session};

/// Everything needed to open a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Relay address, e.g. "127.0.0.1:3000".
    pub server_addr: String,
    /// Display name announced to the room.
    pub username: String,
    /// Shared passphrase; never leaves this process.
    pub passphrase: String,
}

/// Handle to a connected session.
///
/// Send plaintext lines on `to_server`; receive decrypted plaintext lines
/// on `from_server`. Dropping the handle closes the outbound channel, which
/// lets the background task drain queued lines and shut the socket down.
pub struct ConnectedSession {
    /// Plaintext lines to encrypt and send.
    pub to_server: mpsc::Sender<String>,
    /// Decrypted lines received from the relay.
    pub from_server: mpsc::Receiver<String>,
    /// Abort handle for the connection task.
    abort_handle: tokio::task::AbortHandle,
}

impl ConnectedSession {
    /// Abort the connection immediately, without draining queued lines.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Connect to the relay and announce.
///
/// The first outbound frame is the encrypted `"<username> is Connected"`
/// announcement, sent before anything queued on the channel.
pub async fn connect(config: SessionConfig) -> Result<ConnectedSession, SessionError> {
    let stream = TcpStream::connect(&config.server_addr)
        .await
        .map_err(|source| SessionError::Connect { addr: config.server_addr.clone(), source })?;

    let (to_server_tx, to_server_rx) = mpsc::channel::<String>(32);
    let (from_server_tx, from_server_rx) = mpsc::channel::<String>(32);

    let handle = tokio::spawn(run_session(stream, config, to_server_rx, from_server_tx));

    Ok(ConnectedSession {
        to_server: to_server_tx,
        from_server: from_server_rx,
        abort_handle: handle.abort_handle(),
    })
}

/// Bridge the channel pair to the socket until either side closes.
async fn run_session(
    stream: TcpStream,
    config: SessionConfig,
    mut to_server: mpsc::Receiver<String>,
    from_server: mpsc::Sender<String>,
) {
    let (read_half, mut write_half) = stream.into_split();

    let reader_handle =
        tokio::spawn(read_loop(read_half, config.passphrase.clone(), from_server));

    let announcement = session::announce_message(&config.username);
    if let Err(e) = send_line(&mut write_half, &announcement, &config.passphrase).await {
        tracing::warn!(error = %e, "failed to announce");
    }

    while let Some(text) = to_server.recv().await {
        if let Err(e) = send_line(&mut write_half, &text, &config.passphrase).await {
            tracing::warn!(error = %e, "send failed, closing session");
            break;
        }
    }

    let _ = write_half.shutdown().await;
    reader_handle.abort();
}

/// Encrypt one line and write it newline-terminated.
async fn send_line(
    writer: &mut OwnedWriteHalf,
    text: &str,
    passphrase: &str,
) -> io::Result<()> {
    let envelope = saltwire_crypto::encrypt(text, passphrase);
    writer.write_all(format!("{envelope}\n").as_bytes()).await
}

/// Read inbound lines, decrypt each independently, and deliver plaintext.
///
/// A line that is not a well-formed envelope is logged and skipped; a line
/// that fails decryption is dropped without being surfaced. EOF or a read
/// error ends the loop.
async fn read_loop(
    read_half: OwnedReadHalf,
    passphrase: String,
    from_server: mpsc::Sender<String>,
) {
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                tracing::debug!("relay closed the connection");
                break;
            },
            Ok(_) => {
                let envelope = line.trim();
                if envelope.is_empty() {
                    continue;
                }
                match saltwire_crypto::decrypt(envelope, &passphrase) {
                    Ok(plaintext) => {
                        if from_server.send(plaintext).await.is_err() {
                            // Receiver dropped; nobody is listening anymore.
                            break;
                        }
                    },
                    Err(CodecError::Decode { reason }) => {
                        tracing::warn!(reason, "skipping malformed line");
                    },
                    Err(CodecError::Authentication { .. }) => {
                        tracing::debug!("dropping unreadable message");
                    },
                }
            },
            Err(e) => {
                tracing::debug!(error = %e, "read failed");
                break;
            },
        }
    }
}
