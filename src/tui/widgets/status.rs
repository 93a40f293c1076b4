// ABOUTME: Status bar widget — renders endpoint, message count, and the sending indicator.
// ABOUTME: Displayed at the bottom of the TUI as a single-line summary.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Render the status bar line.
pub fn status_line(endpoint: &str, message_count: usize, sending: bool) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(format!(" {} ", endpoint), Style::default().fg(Color::Cyan)),
        Span::styled("| ", dim),
        Span::styled(
            format!("{} ", format_count(message_count)),
            Style::default().fg(Color::White),
        ),
    ];

    if sending {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled("sending... ", Style::default().fg(Color::Yellow)));
    }

    spans.push(Span::styled("| ^L clear  Esc quit ", dim));

    Line::from(spans)
}

fn format_count(count: usize) -> String {
    match count {
        1 => "1 message".to_string(),
        n => format!("{} messages", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn format_count_pluralizes() {
        assert_eq!(format_count(0), "0 messages");
        assert_eq!(format_count(1), "1 message");
        assert_eq!(format_count(12), "12 messages");
    }

    #[test]
    fn status_line_shows_sending() {
        let line = status_line("http://localhost:5000/chat", 3, true);
        let text = text(&line);
        assert!(text.contains("localhost:5000"));
        assert!(text.contains("3 messages"));
        assert!(text.contains("sending..."));
    }

    #[test]
    fn status_line_idle() {
        let line = status_line("http://host/chat", 0, false);
        assert!(!text(&line).contains("sending"));
    }
}
