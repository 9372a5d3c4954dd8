//! Saltwire terminal client entry point.
//!
//! # Usage
//!
//! ```bash
//! saltwire                        # connect to 127.0.0.1:3000
//! saltwire --server chat.lan:3000
//! ```

use clap::Parser;
use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use saltwire_client::{ChatSession, SessionConfig, format_message};
use saltwire_tui::{InputEvent, InputState, KeyInput, TerminalGuard, prompt};
use thiserror::Error;

/// Saltwire encrypted chat client
#[derive(Parser, Debug)]
#[command(name = "saltwire")]
#[command(about = "Terminal client for saltwire encrypted chat")]
#[command(version)]
struct Args {
    /// Relay address to connect to
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    server: String,
}

/// Top-level client errors.
#[derive(Debug, Error)]
enum ClientError {
    /// Terminal or prompt I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The session could not be opened.
    #[error(transparent)]
    Session(#[from] saltwire_client::SessionError),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let username = prompt::read_username()?;
    let passphrase = prompt::read_passphrase()?;

    let session = ChatSession::connect(SessionConfig {
        server_addr: args.server,
        username,
        passphrase,
    })
    .await
    .map_err(ClientError::Session)?;

    let mut terminal = TerminalGuard::new().map_err(ClientError::Io)?;
    let result = run_chat(session, &mut terminal).await;
    drop(terminal);

    Ok(result?)
}

/// Event loop: terminal keys in, decrypted messages out.
///
/// The shared message history is owned here; the receive task only hands
/// lines over a channel, so display updates never observe a partial write.
async fn run_chat(mut session: ChatSession, terminal: &mut TerminalGuard) -> Result<(), ClientError> {
    let mut events = EventStream::new();
    let mut messages: Vec<String> = Vec::new();
    let mut input = InputState::new();

    loop {
        terminal.draw(&messages, &input)?;

        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if key.modifiers.contains(KeyModifiers::CONTROL)
                            && key.code == KeyCode::Char('c')
                        {
                            break;
                        }
                        match convert_key(key.code).and_then(|k| input.handle_key(k)) {
                            Some(InputEvent::Submitted(text)) => {
                                // Local echo; the relay never sends it back.
                                messages.push(format_message(session.username(), &text));
                                if session.send(&text).await.is_err() {
                                    break;
                                }
                            },
                            Some(InputEvent::Quit) => break,
                            None => {},
                        }
                    },
                    Some(Ok(_)) => {},
                    Some(Err(e)) => return Err(ClientError::Io(e)),
                    None => break,
                }
            }

            maybe_line = session.recv() => {
                match maybe_line {
                    Some(line) => messages.push(line),
                    None => break,
                }
            }
        }
    }

    // Graceful shutdown: best-effort disconnect notice, then close.
    session.disconnect().await;

    Ok(())
}

/// Convert a crossterm key code to a [`KeyInput`].
fn convert_key(code: KeyCode) -> Option<KeyInput> {
    match code {
        KeyCode::Char(c) => Some(KeyInput::Char(c)),
        KeyCode::Enter => Some(KeyInput::Enter),
        KeyCode::Backspace => Some(KeyInput::Backspace),
        KeyCode::Delete => Some(KeyInput::Delete),
        KeyCode::Esc => Some(KeyInput::Esc),
        KeyCode::Left => Some(KeyInput::Left),
        KeyCode::Right => Some(KeyInput::Right),
        KeyCode::Home => Some(KeyInput::Home),
        KeyCode::End => Some(KeyInput::End),
        _ => None,
    }
}
