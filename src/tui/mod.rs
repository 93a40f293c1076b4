// ABOUTME: TUI module — ratatui full-screen chat interface.
// ABOUTME: Transcript display, input handling, status bar, and the ChatWidget state machine.

pub mod input;
pub mod state;
pub mod terminal;
pub mod ui;
pub mod widget;
pub mod widgets;

pub use state::*;
pub use widget::{APOLOGY, ChatWidget, Phase};
