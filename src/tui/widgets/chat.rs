// ABOUTME: Chat widget — renders transcript messages into styled ratatui Lines.
// ABOUTME: User and assistant messages get distinct prefixes; a pending line trails an in-flight exchange.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::state::{Message, Origin};
use crate::tui::widgets::markup::render_markup;

/// Text of the transient line shown while an exchange is in flight.
pub const PENDING_TEXT: &str = "AI is thinking...";

fn prefix(origin: Origin) -> Span<'static> {
    match origin {
        Origin::User => Span::styled(
            "❯ ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Origin::Assistant => Span::styled(
            "⏺ ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
    }
}

/// Render one message: markup-transformed text with the origin prefix on its first line.
pub fn message_lines(text: &str, origin: Origin) -> Vec<Line<'static>> {
    let mut lines = render_markup(text);
    match lines.first_mut() {
        Some(first) => first.spans.insert(0, prefix(origin)),
        None => lines.push(Line::from(prefix(origin))),
    }
    lines
}

/// The pending indicator line.
pub fn pending_line() -> Line<'static> {
    Line::from(vec![
        Span::styled("⏺ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            PENDING_TEXT,
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ),
    ])
}

/// Render the transcript into styled Lines, with a blank separator between messages.
pub fn render_chat_lines(messages: &[Message], pending: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (idx, msg) in messages.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }
        lines.extend(message_lines(msg.text(), msg.origin()));
    }

    if pending {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(pending_line());
    }

    lines
}
