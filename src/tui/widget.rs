// ABOUTME: ChatWidget — owns the transcript and input, dispatches exchanges, and applies their outcomes.
// ABOUTME: Idle -> Sending -> {Rendered | Failed} -> Idle; only the latest exchange may settle.

use std::sync::Arc;

use ratatui::text::Line;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::exchange::{ChatReply, ChatRequest, ChatTransport, ExchangeError, ExchangeOutcome};
use crate::tui::state::{InputBuffer, Message, Origin, Transcript};
use crate::tui::widgets::chat::message_lines;

/// Shown in place of a reply whenever an exchange fails, whatever the cause.
pub const APOLOGY: &str = "Sorry, there was an error processing your request. Please try again.";

/// Where the widget is in its exchange cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Waiting on the exchange tagged `seq`. Outcomes with any other tag are stale.
    Sending { seq: u64 },
}

/// The chat widget. Collaborators are injected so tests can substitute fakes.
pub struct ChatWidget {
    transcript: Transcript,
    pub input: InputBuffer,
    /// Lines scrolled up from the bottom of the transcript (0 = pinned to bottom).
    pub scroll_offset: u16,
    /// Lines moved per PageUp/PageDown.
    pub page_scroll: u16,
    pub title: String,
    pub endpoint: String,
    phase: Phase,
    last_seq: u64,
    transport: Arc<dyn ChatTransport>,
    outcomes: mpsc::UnboundedSender<ExchangeOutcome>,
}

impl ChatWidget {
    /// Create an idle widget that sends through `transport` and reports
    /// settled exchanges on `outcomes`.
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        outcomes: mpsc::UnboundedSender<ExchangeOutcome>,
    ) -> Self {
        Self {
            transcript: Transcript::new(),
            input: InputBuffer::new(),
            scroll_offset: 0,
            page_scroll: 10,
            title: "chatline".to_string(),
            endpoint: String::new(),
            phase: Phase::Idle,
            last_seq: 0,
            transport,
            outcomes,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_page_scroll(mut self, lines: u16) -> Self {
        self.page_scroll = lines.max(1);
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn messages(&self) -> &[Message] {
        self.transcript.messages()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_sending(&self) -> bool {
        matches!(self.phase, Phase::Sending { .. })
    }

    /// The pending indicator exists exactly while an exchange is in flight.
    pub fn has_pending_indicator(&self) -> bool {
        self.is_sending()
    }

    /// Submit the current input buffer, as a form submission would.
    pub fn submit_input(&mut self) -> Option<u64> {
        if self.input.is_blank() {
            return None;
        }
        let text = self.input.text.clone();
        self.submit(&text)
    }

    /// Append a user message and start an exchange carrying it.
    ///
    /// Blank text is ignored: no transcript change, no request, input untouched.
    /// Returns the sequence number of the dispatched exchange. A submit while
    /// another exchange is in flight supersedes it.
    pub fn submit(&mut self, text: &str) -> Option<u64> {
        let message = text.trim();
        if message.is_empty() {
            return None;
        }
        let message = message.to_string();

        self.push(Message::user(message.clone()));
        self.input.clear();

        self.last_seq += 1;
        let seq = self.last_seq;
        if let Phase::Sending { seq: prior } = self.phase {
            debug!(prior, seq, "superseding in-flight exchange");
        }
        self.phase = Phase::Sending { seq };
        info!(seq, chars = message.chars().count(), "dispatching exchange");

        self.dispatch(seq, message);
        Some(seq)
    }

    fn dispatch(&self, seq: u64, message: String) {
        let transport = Arc::clone(&self.transport);
        let outcomes = self.outcomes.clone();
        tokio::spawn(async move {
            let request = ChatRequest { message };
            let result = transport.send(&request).await;
            // A closed receiver means the UI loop is gone; nothing left to update.
            let _ = outcomes.send(ExchangeOutcome { seq, result });
        });
    }

    /// Single resolution point for settled exchanges.
    pub fn resolve(&mut self, outcome: ExchangeOutcome) {
        if self.phase != (Phase::Sending { seq: outcome.seq }) {
            debug!(seq = outcome.seq, phase = ?self.phase, "discarding stale exchange outcome");
            return;
        }
        match outcome.result {
            Ok(reply) => self.on_response(reply),
            Err(reason) => self.on_failure(reason),
        }
    }

    /// Apply a successful transport response. An `error` field, or a missing
    /// `response` field, is still a failure.
    pub fn on_response(&mut self, reply: ChatReply) {
        if let Some(error) = reply.application_error() {
            let error = error.to_string();
            return self.on_failure(ExchangeError::Application(error));
        }
        let Some(text) = reply.response else {
            return self.on_failure(ExchangeError::MissingResponse);
        };

        self.phase = Phase::Idle;
        info!(chars = text.chars().count(), "exchange rendered");
        self.push(Message::assistant(text));
    }

    /// Record a failed exchange. The reason goes to the log only.
    pub fn on_failure(&mut self, reason: ExchangeError) {
        self.phase = Phase::Idle;
        warn!(kind = reason.kind(), error = %reason, "exchange failed");
        self.push(Message::assistant(APOLOGY));
    }

    /// Empty the transcript and drop the pending indicator. Any in-flight
    /// exchange is abandoned; its outcome will be discarded.
    pub fn clear(&mut self) {
        if let Phase::Sending { seq } = self.phase {
            debug!(seq, "abandoning in-flight exchange on clear");
        }
        self.transcript.clear();
        self.phase = Phase::Idle;
        self.scroll_offset = 0;
        info!("transcript cleared");
    }

    /// Render a message the way the transcript displays it.
    pub fn render_message(&self, text: &str, origin: Origin) -> Vec<Line<'static>> {
        message_lines(text, origin)
    }

    /// Append to the transcript and pin the view to the newest message.
    fn push(&mut self, message: Message) {
        self.transcript.push(message);
        self.scroll_offset = 0;
    }
}
