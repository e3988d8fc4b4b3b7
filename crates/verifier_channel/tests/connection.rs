use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use verifier_channel::{
    ChannelError, ChannelEvent, ChannelSettings, ChannelState, ConnectionManager, EventSink,
};

const WAIT: Duration = Duration::from_secs(5);

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(verifier_logging::initialize_for_tests);
}

struct TestSink {
    tx: mpsc::UnboundedSender<ChannelEvent>,
}

impl EventSink for TestSink {
    fn emit(&self, event: ChannelEvent) {
        let _ = self.tx.send(event);
    }
}

fn manager(endpoint: String) -> (ConnectionManager, mpsc::UnboundedReceiver<ChannelEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let settings = ChannelSettings {
        endpoint,
        connect_timeout: Duration::from_secs(2),
    };
    let manager = ConnectionManager::new(settings, Arc::new(TestSink { tx })).unwrap();
    (manager, rx)
}

async fn next_event(rx: &mut mpsc::UnboundedReceiver<ChannelEvent>) -> ChannelEvent {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("event before timeout")
        .expect("sink still alive")
}

/// Accepts connections, answers the first text message with `reply`, then
/// closes. Returns the endpoint, the accept counter and the received payloads.
async fn echo_server(
    reply: &'static str,
) -> (String, Arc<AtomicUsize>, mpsc::UnboundedReceiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("ws://{}/ws", listener.local_addr().unwrap());
    let accepted = Arc::new(AtomicUsize::new(0));
    let (payload_tx, payload_rx) = mpsc::unbounded_channel();

    let counter = accepted.clone();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            let payload_tx = payload_tx.clone();
            tokio::spawn(async move {
                let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
                while let Some(Ok(message)) = ws.next().await {
                    if let Message::Text(text) = message {
                        let _ = payload_tx.send(text);
                        ws.send(Message::Text(reply.to_string())).await.unwrap();
                        let _ = ws.close(None).await;
                        break;
                    }
                }
            });
        }
    });

    (endpoint, accepted, payload_rx)
}

/// Accepts connections on `listener` and records every text message, keeping
/// each connection open.
fn recording_server(listener: TcpListener) -> mpsc::UnboundedReceiver<String> {
    let (payload_tx, payload_rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let payload_tx = payload_tx.clone();
            tokio::spawn(async move {
                let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();
                while let Some(Ok(message)) = ws.next().await {
                    if let Message::Text(text) = message {
                        let _ = payload_tx.send(text);
                    }
                }
            });
        }
    });
    payload_rx
}

async fn next_payload(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
    tokio::time::timeout(WAIT, rx.recv())
        .await
        .expect("payload before timeout")
        .expect("server still alive")
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn send_before_open_is_delivered_once_open() {
    init_logging();
    let (endpoint, _accepted, mut payloads) = echo_server(r#"{"phase":"check_domain"}"#).await;
    let (manager, mut events) = manager(endpoint);

    manager.send(r#"{"url":"https://example.com"}"#).unwrap();
    manager.connect().unwrap();

    assert_eq!(next_event(&mut events).await, ChannelEvent::Opened);
    let received = tokio::time::timeout(WAIT, payloads.recv()).await.unwrap();
    assert_eq!(received.as_deref(), Some(r#"{"url":"https://example.com"}"#));
    assert_eq!(
        next_event(&mut events).await,
        ChannelEvent::Frame(r#"{"phase":"check_domain"}"#.to_string())
    );
    assert_eq!(next_event(&mut events).await, ChannelEvent::Closed);
    assert_eq!(manager.state(), ChannelState::Closed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn connect_twice_opens_one_channel() {
    init_logging();
    let (endpoint, accepted, _payloads) = echo_server("{}").await;
    let (manager, mut events) = manager(endpoint);

    manager.connect().unwrap();
    manager.connect().unwrap();
    assert_eq!(next_event(&mut events).await, ChannelEvent::Opened);
    manager.connect().unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(accepted.load(Ordering::SeqCst), 1);
    assert_eq!(manager.state(), ChannelState::Open);
    assert!(events.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn refused_connection_reports_error_then_close() {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("ws://{}/ws", listener.local_addr().unwrap());
    drop(listener);

    let (manager, mut events) = manager(endpoint);
    manager.send("dropped").unwrap();
    manager.connect().unwrap();

    assert!(matches!(next_event(&mut events).await, ChannelEvent::Error(_)));
    assert_eq!(next_event(&mut events).await, ChannelEvent::Closed);
    assert_eq!(manager.state(), ChannelState::Closed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn explicit_close_reports_closed() {
    init_logging();
    let (endpoint, _accepted, _payloads) = echo_server("{}").await;
    let (manager, mut events) = manager(endpoint);

    manager.connect().unwrap();
    assert_eq!(next_event(&mut events).await, ChannelEvent::Opened);
    manager.close().unwrap();
    assert_eq!(next_event(&mut events).await, ChannelEvent::Closed);
    assert_eq!(manager.state(), ChannelState::Closed);
}

#[test]
fn non_websocket_endpoints_are_rejected() {
    for endpoint in ["http://localhost:8000/ws", "not a url"] {
        let (tx, _rx) = mpsc::unbounded_channel();
        let settings = ChannelSettings {
            endpoint: endpoint.to_string(),
            ..ChannelSettings::default()
        };
        let result = ConnectionManager::new(settings, Arc::new(TestSink { tx }));
        assert!(
            matches!(result, Err(ChannelError::InvalidEndpoint { .. })),
            "{endpoint}"
        );
    }
}

#[test]
fn default_settings_target_local_server() {
    let settings = ChannelSettings::default();
    assert_eq!(settings.endpoint, "ws://localhost:8000/ws");
    assert_eq!(settings.connect_timeout, Duration::from_secs(10));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn second_deferred_send_replaces_the_first() {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let endpoint = format!("ws://{}/ws", listener.local_addr().unwrap());
    let mut payloads = recording_server(listener);
    let (manager, mut events) = manager(endpoint);

    manager.send("a").unwrap();
    manager.send("b").unwrap();
    manager.connect().unwrap();

    assert_eq!(next_event(&mut events).await, ChannelEvent::Opened);
    assert_eq!(next_payload(&mut payloads).await, "b");
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(payloads.try_recv().is_err());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn payload_deferred_before_a_refused_connect_is_not_replayed() {
    init_logging();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let (manager, mut events) = manager(format!("ws://{addr}/ws"));
    manager.send("lost").unwrap();
    manager.connect().unwrap();
    assert!(matches!(next_event(&mut events).await, ChannelEvent::Error(_)));
    assert_eq!(next_event(&mut events).await, ChannelEvent::Closed);

    let mut payloads = recording_server(TcpListener::bind(addr).await.unwrap());
    manager.connect().unwrap();
    assert_eq!(next_event(&mut events).await, ChannelEvent::Opened);
    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(payloads.try_recv().is_err());

    manager.send("fresh").unwrap();
    assert_eq!(next_payload(&mut payloads).await, "fresh");
}
