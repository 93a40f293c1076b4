// ABOUTME: App orchestrator — wires config, HTTP transport, ChatWidget, and the terminal together.
// ABOUTME: Runs the single UI loop that multiplexes terminal events and exchange outcomes.

use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::Config;
use crate::exchange::{ExchangeOutcome, HttpTransport};
use crate::tui::input::{InputResult, handle_key, handle_mouse, handle_paste};
use crate::tui::terminal::{self, EventReader, TermEvent, Tui};
use crate::tui::{ChatWidget, ui};

/// Top-level application.
pub struct App {
    config: Config,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Build the widget, take over the terminal, and run until the user quits.
    pub async fn run(self) -> anyhow::Result<()> {
        let transport =
            HttpTransport::new(&self.config.endpoint).context("building HTTP client")?;
        let chat_url = transport.chat_url().to_string();

        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<ExchangeOutcome>();
        let mut widget = ChatWidget::new(Arc::new(transport), outcome_tx)
            .with_title(self.config.ui.title.clone())
            .with_endpoint(chat_url.clone())
            .with_page_scroll(self.config.ui.page_scroll);

        info!(endpoint = %chat_url, "starting chat session");

        terminal::install_panic_hook();
        let mut tui = terminal::init().context("initializing terminal")?;
        let result = run_loop(&mut tui, &mut widget, &mut outcome_rx).await;
        let restored = terminal::restore().context("restoring terminal");

        info!(messages = widget.transcript().len(), "chat session ended");
        terminal::keep_primary(result, restored)
    }
}

async fn run_loop(
    tui: &mut Tui,
    widget: &mut ChatWidget,
    outcomes: &mut mpsc::UnboundedReceiver<ExchangeOutcome>,
) -> anyhow::Result<()> {
    let mut events = EventReader::spawn();

    loop {
        tui.draw(|frame| ui::render(frame, widget))?;

        tokio::select! {
            event = events.next() => {
                let Some(event) = event else { break };
                match event {
                    TermEvent::Key(key) => {
                        if handle_key(widget, key) == InputResult::Quit {
                            break;
                        }
                    }
                    TermEvent::Mouse(mouse) => handle_mouse(widget, mouse),
                    TermEvent::Paste(text) => handle_paste(widget, &text),
                    TermEvent::Resize => {}
                }
            }
            Some(outcome) = outcomes.recv() => widget.resolve(outcome),
        }
    }

    Ok(())
}
