//! UI rendering.
//!
//! Pure rendering functions: chat history pane above, single-line input
//! field below, cursor placed inside the input field.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Position, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::input::InputState;

/// Render the entire UI.
pub fn render(frame: &mut Frame, messages: &[String], input: &InputState) {
    const MESSAGES_MIN_HEIGHT: u16 = 3;
    const INPUT_HEIGHT: u16 = 3;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(MESSAGES_MIN_HEIGHT), Constraint::Length(INPUT_HEIGHT)])
        .split(frame.area());

    let [messages_area, input_area] = chunks.as_ref() else {
        return;
    };

    render_messages(frame, messages, *messages_area);
    render_input(frame, input, *input_area);
}

/// Render the scrolling message pane, pinned to the newest lines.
fn render_messages(frame: &mut Frame, messages: &[String], area: Rect) {
    let visible = usize::from(area.height.saturating_sub(2));
    let start = messages.len().saturating_sub(visible);

    let lines: Vec<Line> = messages[start..].iter().map(|m| Line::from(m.as_str())).collect();

    let pane =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("saltwire"));
    frame.render_widget(pane, area);
}

/// Render the editable input line and place the cursor.
fn render_input(frame: &mut Frame, input: &InputState, area: Rect) {
    let field = Paragraph::new(input.buffer())
        .block(Block::default().borders(Borders::ALL).title("Message"));
    frame.render_widget(field, area);

    let cursor_x = area.x.saturating_add(1).saturating_add(input.cursor() as u16);
    let cursor_y = area.y.saturating_add(1);
    frame.set_cursor_position(Position::new(cursor_x, cursor_y));
}
