//! Pre-connection prompts for the display name and passphrase.
//!
//! These run before the alternate screen is entered. The passphrase is
//! collected character by character in raw mode and echoed as asterisks,
//! with backspace support; it never appears on screen.

use std::io::{self, BufRead, Write};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};

/// Restores cooked mode even on early return.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

/// Prompt for a display name on stdin. Empty input falls back to
/// "Anonymous".
pub fn read_username() -> io::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "Enter username: ")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let name = line.trim();
    Ok(if name.is_empty() { "Anonymous".to_string() } else { name.to_string() })
}

/// Prompt for the passphrase with masked echo.
pub fn read_passphrase() -> io::Result<String> {
    let mut stdout = io::stdout();
    write!(stdout, "Enter passphrase: ")?;
    stdout.flush()?;

    let _guard = RawModeGuard::enable()?;
    let mut passphrase = String::new();

    loop {
        let Event::Key(key) = event::read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match key.code {
            KeyCode::Enter => break,
            KeyCode::Backspace => {
                if passphrase.pop().is_some() {
                    write!(stdout, "\u{8} \u{8}")?;
                    stdout.flush()?;
                }
            },
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Err(io::Error::new(io::ErrorKind::Interrupted, "cancelled"));
            },
            KeyCode::Char(c) => {
                passphrase.push(c);
                write!(stdout, "*")?;
                stdout.flush()?;
            },
            _ => {},
        }
    }

    // Raw mode swallows the Enter echo.
    write!(stdout, "\r\n")?;
    stdout.flush()?;

    Ok(passphrase)
}
