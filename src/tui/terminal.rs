// ABOUTME: Terminal lifecycle — raw mode, alternate screen, mouse/paste capture, and the event reader task.
// ABOUTME: restore() undoes everything init() did; a panic hook calls it too.

use std::io::{self, Stderr};

use anyhow::Result;
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    Event, KeyEvent, KeyEventKind, KeyboardEnhancementFlags, MouseEvent,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    supports_keyboard_enhancement,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tracing::{debug, warn};

pub type Tui = Terminal<CrosstermBackend<Stderr>>;

/// Terminal input events the UI loop cares about.
#[derive(Debug)]
pub enum TermEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Paste(String),
    Resize,
}

/// Reads crossterm events on a background task and forwards them over a channel.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<TermEvent>,
}

impl EventReader {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            while let Some(evt) = reader.next().await {
                let term_event = match evt {
                    // Only key presses; releases arrive when enhancement flags are on.
                    Ok(Event::Key(key)) if key.kind != KeyEventKind::Release => {
                        Some(TermEvent::Key(key))
                    }
                    Ok(Event::Mouse(mouse)) => Some(TermEvent::Mouse(mouse)),
                    Ok(Event::Paste(text)) => Some(TermEvent::Paste(text)),
                    Ok(Event::Resize(_, _)) => Some(TermEvent::Resize),
                    Ok(_) => None,
                    Err(e) => {
                        warn!(error = %e, "terminal event stream error");
                        None
                    }
                };

                if let Some(event) = term_event {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<TermEvent> {
        self.rx.recv().await
    }
}

pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    // Raw mode is already on, so a failed setup must be undone.
    rollback_on_error(enter(), restore)
}

fn enter() -> Result<Tui> {
    execute!(
        io::stderr(),
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    )?;

    // Shift+Enter is only distinguishable from Enter with disambiguated key codes.
    if supports_keyboard_enhancement().unwrap_or(false) {
        execute!(
            io::stderr(),
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        debug!("keyboard enhancement enabled");
    }

    let backend = CrosstermBackend::new(io::stderr());
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

pub fn restore() -> Result<()> {
    if supports_keyboard_enhancement().unwrap_or(false) {
        execute!(io::stderr(), PopKeyboardEnhancementFlags)?;
    }
    execute!(
        io::stderr(),
        DisableBracketedPaste,
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    disable_raw_mode()?;
    Ok(())
}

/// Return `primary` unchanged. A failed restore is logged, never returned in its place.
pub fn keep_primary<T>(primary: Result<T>, restored: Result<()>) -> Result<T> {
    if let Err(e) = restored {
        warn!(error = %e, "failed to restore terminal");
    }
    primary
}

fn rollback_on_error<T>(setup: Result<T>, rollback: impl FnOnce() -> Result<()>) -> Result<T> {
    match setup {
        Ok(value) => Ok(value),
        Err(e) => keep_primary(Err(e), rollback()),
    }
}

/// Install panic hook to restore terminal on panic.
pub fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        original_hook(panic_info);
    }));
}
