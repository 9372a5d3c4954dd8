//! Broadcast relay: accept loop and per-session lifecycle.
//!
//! One tokio task per accepted connection. A session moves through four
//! phases: connecting (socket accepted), announcing (first line is the
//! client's encrypted-username envelope), relaying (every further line is
//! forwarded verbatim to all other sessions), and closed (paired registry
//! removal, exactly once, regardless of which failure path got us there).
//!
//! The relay never decrypts anything. Envelopes are base64 text and base64
//! never contains a newline, so a trailing `\n` per envelope is an
//! unambiguous frame delimiter that survives TCP segmentation.

use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{
        TcpListener, TcpStream,
        tcp::{OwnedReadHalf, OwnedWriteHalf},
    },
    sync::{Mutex, RwLock},
};

use crate::{ConnectionRegistry, RelayError, SessionId};

/// Relay configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address to bind to (e.g. "127.0.0.1:3000").
    pub bind_address: String,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self { bind_address: "127.0.0.1:3000".to_string() }
    }
}

/// Shared state for all sessions.
///
/// The registry tracks who is live and what they announced; the writer map
/// holds each session's outbound socket half. Fan-out iterates registry
/// snapshots, so neither lock is held across a full broadcast of one
/// recipient's slow write.
struct SharedState {
    /// Live connections and announced-username envelopes.
    registry: Mutex<ConnectionRegistry>,
    /// Session ID → outbound socket half. Per-writer mutex so concurrent
    /// broadcasts to different recipients do not serialize on one lock.
    writers: RwLock<HashMap<SessionId, Mutex<OwnedWriteHalf>>>,
}

/// The saltwire broadcast relay.
///
/// Accepts TCP connections and forwards opaque encrypted envelopes between
/// them without ever holding a passphrase.
pub struct RelayServer {
    listener: TcpListener,
    shared: Arc<SharedState>,
}

impl RelayServer {
    /// Bind the listening socket.
    ///
    /// This is the only globally fatal failure in the relay; everything
    /// after bind is scoped to a single session.
    pub async fn bind(config: RelayConfig) -> Result<Self, RelayError> {
        let listener = TcpListener::bind(&config.bind_address)
            .await
            .map_err(|source| RelayError::Bind { addr: config.bind_address.clone(), source })?;

        Ok(Self {
            listener,
            shared: Arc::new(SharedState {
                registry: Mutex::new(ConnectionRegistry::new()),
                writers: RwLock::new(HashMap::new()),
            }),
        })
    }

    /// Local address the relay is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, RelayError> {
        self.listener.local_addr().map_err(RelayError::LocalAddr)
    }

    /// Run the accept loop, spawning one task per connection.
    ///
    /// Runs until the process is shut down. Accept errors are logged and
    /// the loop continues; they affect no live session.
    pub async fn run(self) -> Result<(), RelayError> {
        if let Ok(addr) = self.local_addr() {
            tracing::info!(%addr, "relay listening");
        }

        loop {
            match self.listener.accept().await {
                Ok((stream, peer_addr)) => {
                    let shared = Arc::clone(&self.shared);
                    tokio::spawn(async move {
                        tracing::debug!(peer = %peer_addr, "connection accepted");
                        handle_session(stream, shared).await;
                    });
                },
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                },
            }
        }
    }
}

/// Drive one session from accept to teardown.
///
/// Cleanup lives on this single exit path, so the paired removal of the
/// connection and its username entry happens exactly once no matter which
/// phase failed.
async fn handle_session(stream: TcpStream, shared: Arc<SharedState>) {
    let session_id: SessionId = rand::random();
    let (read_half, write_half) = stream.into_split();

    {
        let mut writers = shared.writers.write().await;
        writers.insert(session_id, Mutex::new(write_half));
    }
    {
        let mut registry = shared.registry.lock().await;
        registry.add_connection(session_id);
    }

    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    match reader.read_line(&mut line).await {
        Ok(0) => {
            tracing::debug!(session_id, "disconnected before announcing");
        },
        Ok(_) => {
            let envelope = line.trim().to_string();
            if envelope.is_empty() {
                tracing::debug!(session_id, "blank announcement, closing");
            } else {
                announce(session_id, envelope, &shared).await;
                relay_loop(session_id, &mut reader, &shared).await;
            }
        },
        Err(e) => {
            tracing::debug!(session_id, error = %e, "read failed before announcing");
        },
    }

    {
        let mut registry = shared.registry.lock().await;
        registry.remove_connection(session_id);
    }
    {
        let mut writers = shared.writers.write().await;
        writers.remove(&session_id);
    }

    tracing::info!(session_id, "session closed");
}

/// Register the joiner's username envelope and sync both directions.
///
/// The joiner first receives every currently-registered username envelope,
/// one per line. Failures sending these are logged per line and do not
/// abort registration. Then the joiner's own envelope goes out to all other
/// live connections as its arrival notice.
async fn announce(session_id: SessionId, envelope: String, shared: &SharedState) {
    let known = {
        let mut registry = shared.registry.lock().await;
        registry.add_username(session_id, envelope.clone());
        registry.snapshot_usernames()
    };

    {
        let writers = shared.writers.read().await;
        if let Some(writer) = writers.get(&session_id) {
            let mut writer = writer.lock().await;
            for user_envelope in known {
                if let Err(e) = writer.write_all(format!("{user_envelope}\n").as_bytes()).await {
                    tracing::warn!(session_id, error = %e, "failed to send user-list entry");
                }
            }
        }
    }

    broadcast(session_id, &envelope, shared).await;
    tracing::info!(session_id, "session announced");
}

/// Steady state: forward each inbound envelope to everyone else.
///
/// An EOF read (0 bytes) is a graceful disconnect; a read error tears the
/// session down the same way. Blank lines are skipped.
async fn relay_loop(
    session_id: SessionId,
    reader: &mut BufReader<OwnedReadHalf>,
    shared: &SharedState,
) {
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                tracing::debug!(session_id, "peer disconnected");
                break;
            },
            Ok(_) => {
                let envelope = line.trim();
                if envelope.is_empty() {
                    continue;
                }
                broadcast(session_id, envelope, shared).await;
            },
            Err(e) => {
                tracing::debug!(session_id, error = %e, "read failed");
                break;
            },
        }
    }
}

/// Forward one opaque envelope to every live connection except the origin.
///
/// Best-effort per recipient: a failed write is logged and skipped so one
/// dead peer cannot block delivery to the rest. The registry lock is only
/// held long enough to snapshot the recipient list.
async fn broadcast(origin: SessionId, envelope: &str, shared: &SharedState) {
    let recipients = {
        let registry = shared.registry.lock().await;
        registry.snapshot_connections()
    };

    let frame = format!("{envelope}\n");
    let writers = shared.writers.read().await;

    for session_id in recipients {
        if session_id == origin {
            continue;
        }
        let Some(writer) = writers.get(&session_id) else {
            // Departed between snapshot and fan-out.
            continue;
        };
        let mut writer = writer.lock().await;
        if let Err(e) = writer.write_all(frame.as_bytes()).await {
            tracing::warn!(recipient = session_id, error = %e, "broadcast write failed");
        }
    }
}
