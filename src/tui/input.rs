// ABOUTME: Keyboard and mouse handling for the TUI — translates terminal events into widget actions.
// ABOUTME: Plain Enter submits, Shift+Enter inserts a newline, Ctrl+L clears, Esc quits.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};

use crate::tui::widget::ChatWidget;

const MOUSE_SCROLL_STEP: u16 = 3;

/// The result of processing a key event.
#[derive(Debug, PartialEq)]
pub enum InputResult {
    /// No action needed beyond a redraw.
    None,
    /// An exchange was dispatched with this sequence number.
    Submitted(u64),
    /// The transcript was cleared.
    Cleared,
    /// User wants to quit.
    Quit,
}

/// Process a key event against the widget and return the resulting action.
pub fn handle_key(widget: &mut ChatWidget, key: KeyEvent) -> InputResult {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => return InputResult::Quit,
            KeyCode::Char('l') => {
                widget.clear();
                return InputResult::Cleared;
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::PageUp => {
            widget.scroll_offset = widget.scroll_offset.saturating_add(widget.page_scroll);
            InputResult::None
        }
        KeyCode::PageDown => {
            widget.scroll_offset = widget.scroll_offset.saturating_sub(widget.page_scroll);
            InputResult::None
        }
        // Up/Down move within multiline input first, then fall back to scrolling.
        KeyCode::Up => {
            if !widget.input.move_cursor_up() {
                widget.scroll_offset = widget.scroll_offset.saturating_add(1);
            }
            InputResult::None
        }
        KeyCode::Down => {
            if !widget.input.move_cursor_down() {
                widget.scroll_offset = widget.scroll_offset.saturating_sub(1);
            }
            InputResult::None
        }
        // Only a plain Enter submits; any modifier inserts a literal newline.
        KeyCode::Enter if key.modifiers.is_empty() => match widget.submit_input() {
            Some(seq) => InputResult::Submitted(seq),
            None => InputResult::None,
        },
        KeyCode::Enter => {
            widget.input.insert_char('\n');
            InputResult::None
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            widget.input.insert_char(c);
            InputResult::None
        }
        KeyCode::Backspace => {
            widget.input.backspace();
            InputResult::None
        }
        KeyCode::Delete => {
            widget.input.delete();
            InputResult::None
        }
        KeyCode::Left => {
            widget.input.move_cursor_left();
            InputResult::None
        }
        KeyCode::Right => {
            widget.input.move_cursor_right();
            InputResult::None
        }
        KeyCode::Home => {
            widget.input.move_cursor_home();
            InputResult::None
        }
        KeyCode::End => {
            widget.input.move_cursor_end_of_line();
            InputResult::None
        }
        KeyCode::Esc => InputResult::Quit,
        _ => InputResult::None,
    }
}

/// Scroll the transcript with the mouse wheel.
pub fn handle_mouse(widget: &mut ChatWidget, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => {
            widget.scroll_offset = widget.scroll_offset.saturating_add(MOUSE_SCROLL_STEP);
        }
        MouseEventKind::ScrollDown => {
            widget.scroll_offset = widget.scroll_offset.saturating_sub(MOUSE_SCROLL_STEP);
        }
        _ => {}
    }
}

/// Insert pasted text into the input buffer.
pub fn handle_paste(widget: &mut ChatWidget, text: &str) {
    widget.input.insert_str(&text.replace("\r\n", "\n"));
}
