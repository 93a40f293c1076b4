// ABOUTME: Main TUI rendering function — assembles header, transcript, input, and status bar.
// ABOUTME: Splits the terminal frame into vertical layout chunks and delegates to widgets.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::tui::widget::ChatWidget;
use crate::tui::widgets::chat::render_chat_lines;
use crate::tui::widgets::status::status_line;

/// Maximum height the input area can grow to (in terminal rows).
const MAX_INPUT_HEIGHT: u16 = 8;

/// Render the full TUI screen layout to the given frame.
pub fn render(frame: &mut Frame, widget: &mut ChatWidget) {
    let area = frame.area();

    // +2 accounts for top and bottom borders
    let input_height = u16::try_from(widget.input.line_count())
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .clamp(3, MAX_INPUT_HEIGHT);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // Header
            Constraint::Min(3),               // Transcript
            Constraint::Length(input_height), // Input area
            Constraint::Length(1),            // Status bar
        ])
        .split(area);

    // Header
    let header = Line::from(Span::styled(
        format!(" {}", widget.title),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(Paragraph::new(header), chunks[0]);

    // Transcript
    let chat_chunk = chunks[1];
    let visible_height = chat_chunk.height;
    let pending = widget.has_pending_indicator();

    // line_count() matches ratatui's own wrapping, so the bottom of the
    // transcript is never hidden behind the input area.
    let mut chat_paragraph = transcript_paragraph(render_chat_lines(widget.messages(), pending));
    let mut total_lines = chat_paragraph.line_count(chat_chunk.width);

    // Paragraph::scroll takes a u16, so only the newest rows that fit are drawn.
    if total_lines > usize::from(u16::MAX) {
        let (tail, kept) = trailing_lines(
            render_chat_lines(widget.messages(), pending),
            chat_chunk.width,
            usize::from(u16::MAX),
        );
        chat_paragraph = transcript_paragraph(tail);
        total_lines = kept;
    }
    let max_scroll = u16::try_from(total_lines.saturating_sub(usize::from(visible_height)))
        .unwrap_or(u16::MAX);

    if widget.scroll_offset > max_scroll {
        widget.scroll_offset = max_scroll;
    }

    // scroll_offset counts lines up from the bottom (0 = at bottom)
    let scroll = max_scroll.saturating_sub(widget.scroll_offset);
    frame.render_widget(chat_paragraph.scroll((scroll, 0)), chat_chunk);

    // Input area
    let input_chunk = chunks[2];
    let mut input_block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    if widget.is_sending() {
        input_block = input_block.title(Span::styled(
            " sending... ",
            Style::default().fg(Color::DarkGray),
        ));
    }

    // Keep the cursor line visible when the input is taller than its box.
    let inner_height = input_chunk.height.saturating_sub(2);
    let cursor_index = widget.input.cursor_line();
    let cursor_line = u16::try_from(cursor_index).unwrap_or(u16::MAX);
    let input_scroll = cursor_line.saturating_sub(inner_height.saturating_sub(1));

    let input = Paragraph::new(widget.input.text.clone())
        .block(input_block)
        .scroll((input_scroll, 0));
    frame.render_widget(input, input_chunk);

    if input_chunk.width > 0 && input_chunk.height > 1 {
        widget.input.clamp_cursor();

        let cursor_col = widget.input.cursor_column();
        let lines = widget.input.lines();
        let line_text = lines.get(cursor_index).unwrap_or(&"");
        let prefix: String = line_text.chars().take(cursor_col).collect();
        let visual_col = UnicodeWidthStr::width(prefix.as_str());

        let max_visual_col = input_chunk.width.saturating_sub(1) as usize;
        let clamped_visual_col = visual_col.min(max_visual_col);

        let cursor_x = input_chunk.x.saturating_add(clamped_visual_col as u16);
        // +1 for the top border, then offset by the visible cursor line.
        let cursor_y = input_chunk
            .y
            .saturating_add(1 + cursor_line.saturating_sub(input_scroll));
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }

    // Status bar
    let status = status_line(
        &widget.endpoint,
        widget.transcript().len(),
        widget.is_sending(),
    );
    frame.render_widget(Paragraph::new(status), chunks[3]);
}

fn transcript_paragraph(lines: Vec<Line<'static>>) -> Paragraph<'static> {
    Paragraph::new(lines).wrap(Wrap { trim: false })
}

/// Keep the newest lines whose wrapped height fits in `limit` rows.
/// Returns them with their total wrapped height.
fn trailing_lines(
    mut lines: Vec<Line<'static>>,
    width: u16,
    limit: usize,
) -> (Vec<Line<'static>>, usize) {
    let mut kept = 0;
    let mut start = lines.len();
    for line in lines.iter().rev() {
        let height = transcript_paragraph(vec![line.clone()]).line_count(width);
        if kept + height > limit {
            break;
        }
        kept += height;
        start -= 1;
    }
    (lines.split_off(start), kept)
}
