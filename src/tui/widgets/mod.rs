// ABOUTME: TUI widget sub-modules for the transcript, inline markup, and status bar.
// ABOUTME: Each widget is a pure rendering function over plain data.

pub mod chat;
pub mod markup;
pub mod status;
