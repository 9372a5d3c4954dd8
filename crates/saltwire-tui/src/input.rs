//! Input state and key handling.
//!
//! Owns the text input buffer and cursor. Character-level editing happens
//! here; Enter submits the buffer, Escape quits.

/// Key input events from the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyInput {
    /// Character input.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Delete key.
    Delete,
    /// Escape key.
    Esc,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
}

/// What a key press asks the event loop to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// The user submitted a non-empty line.
    Submitted(String),
    /// The user asked to quit.
    Quit,
}

/// Text input buffer and cursor position.
#[derive(Debug, Default)]
pub struct InputState {
    buffer: String,
    cursor: usize,
}

impl InputState {
    /// Create a new empty input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current text in the input buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Current cursor position (character index).
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Handle a key input event.
    ///
    /// Returns `Some` when the event loop must act (submit or quit);
    /// `None` for pure editing keys.
    pub fn handle_key(&mut self, key: KeyInput) -> Option<InputEvent> {
        match key {
            KeyInput::Char(c) => {
                self.buffer.insert(self.byte_cursor(), c);
                self.cursor = self.cursor.saturating_add(1);
                None
            },
            KeyInput::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.cursor.saturating_sub(1);
                    self.buffer.remove(self.byte_cursor());
                }
                None
            },
            KeyInput::Delete => {
                if self.cursor < self.char_count() {
                    self.buffer.remove(self.byte_cursor());
                }
                None
            },
            KeyInput::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            },
            KeyInput::Right => {
                if self.cursor < self.char_count() {
                    self.cursor = self.cursor.saturating_add(1);
                }
                None
            },
            KeyInput::Home => {
                self.cursor = 0;
                None
            },
            KeyInput::End => {
                self.cursor = self.char_count();
                None
            },
            KeyInput::Enter => {
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                if text.is_empty() { None } else { Some(InputEvent::Submitted(text)) }
            },
            KeyInput::Esc => Some(InputEvent::Quit),
        }
    }

    /// Characters in the buffer. The cursor counts characters, not bytes.
    fn char_count(&self) -> usize {
        self.buffer.chars().count()
    }

    /// Byte offset of the cursor into the buffer.
    fn byte_cursor(&self) -> usize {
        self.buffer.char_indices().nth(self.cursor).map_or(self.buffer.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn char_input_adds_to_buffer() {
        let mut input = InputState::new();

        input.handle_key(KeyInput::Char('h'));
        input.handle_key(KeyInput::Char('i'));

        assert_eq!(input.buffer(), "hi");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn backspace_removes_char() {
        let mut input = InputState::new();

        input.handle_key(KeyInput::Char('a'));
        input.handle_key(KeyInput::Char('b'));
        input.handle_key(KeyInput::Backspace);

        assert_eq!(input.buffer(), "a");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn delete_removes_char_under_cursor() {
        let mut input = InputState::new();

        input.handle_key(KeyInput::Char('a'));
        input.handle_key(KeyInput::Char('b'));
        input.handle_key(KeyInput::Home);
        input.handle_key(KeyInput::Delete);

        assert_eq!(input.buffer(), "b");
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn enter_submits_and_clears() {
        let mut input = InputState::new();

        input.handle_key(KeyInput::Char('h'));
        input.handle_key(KeyInput::Char('i'));
        let event = input.handle_key(KeyInput::Enter);

        assert_eq!(event, Some(InputEvent::Submitted("hi".to_string())));
        assert!(input.buffer().is_empty());
        assert_eq!(input.cursor(), 0);
    }

    #[test]
    fn enter_on_empty_buffer_does_nothing() {
        let mut input = InputState::new();

        assert_eq!(input.handle_key(KeyInput::Enter), None);
    }

    #[test]
    fn esc_quits() {
        let mut input = InputState::new();

        assert_eq!(input.handle_key(KeyInput::Esc), Some(InputEvent::Quit));
    }

    #[test]
    fn cursor_movement() {
        let mut input = InputState::new();

        input.handle_key(KeyInput::Char('a'));
        input.handle_key(KeyInput::Char('b'));
        input.handle_key(KeyInput::Char('c'));

        input.handle_key(KeyInput::Home);
        assert_eq!(input.cursor(), 0);

        input.handle_key(KeyInput::End);
        assert_eq!(input.cursor(), 3);

        input.handle_key(KeyInput::Left);
        assert_eq!(input.cursor(), 2);

        input.handle_key(KeyInput::Right);
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn editing_mid_buffer_with_multibyte_chars() {
        let mut input = InputState::new();

        input.handle_key(KeyInput::Char('ü'));
        input.handle_key(KeyInput::Char('b'));
        input.handle_key(KeyInput::Left);
        input.handle_key(KeyInput::Char('a'));

        assert_eq!(input.buffer(), "üab");
        assert_eq!(input.cursor(), 2);
    }
}
