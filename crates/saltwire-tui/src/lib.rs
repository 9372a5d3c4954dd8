//! Terminal client for saltwire.
//!
//! A thin shell over [`saltwire_client::ChatSession`]: it prompts for a
//! display name and passphrase, then renders a scrolling message pane and
//! a single editable input line. All encryption lives in the client crate;
//! this crate only handles terminal I/O.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod input;
pub mod prompt;
pub mod terminal;
pub mod ui;

pub use input::{InputEvent, InputState, KeyInput};
pub use terminal::TerminalGuard;
