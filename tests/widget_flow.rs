// ABOUTME: End-to-end tests driving ChatWidget through the real HTTP transport.
// ABOUTME: A wiremock server plays the chat endpoint; outcomes flow back over the widget's channel.

use std::sync::Arc;
use std::time::Duration;

use ratatui::style::Modifier;
use serde_json::json;
use tokio::sync::mpsc;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chatline::config::EndpointConfig;
use chatline::exchange::{ExchangeOutcome, HttpTransport};
use chatline::tui::{APOLOGY, ChatWidget, Origin, Phase};

fn widget_for(server: &MockServer) -> (ChatWidget, mpsc::UnboundedReceiver<ExchangeOutcome>) {
    let transport = HttpTransport::new(&EndpointConfig {
        base_url: server.uri(),
        ..Default::default()
    })
    .unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    (ChatWidget::new(Arc::new(transport), tx), rx)
}

async fn settle(widget: &mut ChatWidget, rx: &mut mpsc::UnboundedReceiver<ExchangeOutcome>) {
    let outcome = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("exchange settles")
        .expect("channel open");
    widget.resolve(outcome);
}

fn texts(widget: &ChatWidget) -> Vec<&str> {
    widget.messages().iter().map(|m| m.text()).collect()
}

#[tokio::test]
async fn successful_exchange_renders_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({ "message": "say hi" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "**hi**" })))
        .mount(&server)
        .await;

    let (mut widget, mut rx) = widget_for(&server);
    widget.submit("say hi");
    settle(&mut widget, &mut rx).await;

    assert_eq!(texts(&widget), vec!["say hi", "**hi**"]);
    assert_eq!(widget.phase(), Phase::Idle);

    let reply = &widget.messages()[1];
    assert_eq!(reply.origin(), Origin::Assistant);
    let lines = widget.render_message(reply.text(), reply.origin());
    assert_eq!(lines.len(), 1);
    let spans = &lines[0].spans;
    // prefix + "hi"
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[1].content, "hi");
    assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
}

#[tokio::test]
async fn application_error_becomes_apology() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "boom" })))
        .mount(&server)
        .await;

    let (mut widget, mut rx) = widget_for(&server);
    widget.submit("hi");
    settle(&mut widget, &mut rx).await;

    assert_eq!(texts(&widget), vec!["hi", APOLOGY]);
    assert!(!widget.has_pending_indicator());
}

#[tokio::test]
async fn server_error_becomes_single_apology() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let (mut widget, mut rx) = widget_for(&server);
    widget.submit("hi");
    settle(&mut widget, &mut rx).await;

    assert_eq!(texts(&widget).iter().filter(|t| **t == APOLOGY).count(), 1);
    assert!(!widget.has_pending_indicator());
}

#[tokio::test]
async fn slow_stale_reply_does_not_overwrite_latest() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({ "message": "slow" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "response": "slow reply" }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_json(json!({ "message": "fast" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "fast reply" })))
        .mount(&server)
        .await;

    let (mut widget, mut rx) = widget_for(&server);
    widget.submit("slow");
    widget.submit("fast");

    settle(&mut widget, &mut rx).await;
    settle(&mut widget, &mut rx).await;

    assert_eq!(texts(&widget), vec!["slow", "fast", "fast reply"]);
    assert_eq!(widget.phase(), Phase::Idle);
}

#[tokio::test]
async fn clear_during_exchange_discards_late_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "response": "late" }))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&server)
        .await;

    let (mut widget, mut rx) = widget_for(&server);
    widget.submit("hi");
    widget.clear();
    settle(&mut widget, &mut rx).await;

    assert!(widget.transcript().is_empty());
    assert!(!widget.has_pending_indicator());
}
