//! End-to-end relay behavior over real sockets.
//!
//! Each test boots the publisher on an ephemeral port and drives it with
//! real WebSocket clients.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;

use pubsub_publisher::api;
use pubsub_publisher::app_state::AppState;
use pubsub_publisher::client::{AccountMessage, MessageReceiver};
use pubsub_publisher::config::PublisherConfig;
use pubsub_publisher::domain::ConnectionRegistry;
use pubsub_publisher::service::{RelayService, WELCOME_MESSAGE};
use pubsub_publisher::ws::handler::ws_handler;

type WsClient =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(5);
const SILENCE: Duration = Duration::from_millis(200);

async fn start_server() -> SocketAddr {
    let registry = Arc::new(ConnectionRegistry::new());
    let relay = Arc::new(RelayService::new(registry));
    let config = PublisherConfig {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        outbound_queue_capacity: 64,
    };
    let state = AppState { relay, config };

    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn connect(addr: SocketAddr) -> WsClient {
    let (stream, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
        .await
        .unwrap();
    stream
}

async fn recv_text(client: &mut WsClient) -> String {
    loop {
        let frame = timeout(RECV_TIMEOUT, client.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .unwrap();
        match frame {
            Message::Text(text) => return text.as_str().to_owned(),
            Message::Ping(_) | Message::Pong(_) => {}
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

async fn assert_silent(client: &mut WsClient) {
    let frame = timeout(SILENCE, client.next()).await;
    assert!(frame.is_err(), "expected no frame, got {frame:?}");
}

async fn wait_for_connection_count(addr: SocketAddr, expected: u64) {
    let url = format!("http://{addr}/status");
    let deadline = tokio::time::Instant::now() + RECV_TIMEOUT;
    loop {
        let body: serde_json::Value = reqwest::get(&url).await.unwrap().json().await.unwrap();
        if body["active_connections"] == expected {
            return;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "status never reached {expected}: {body}"
        );
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
}

#[tokio::test]
async fn welcome_message_is_first_frame() {
    let addr = start_server().await;
    let mut client = connect(addr).await;
    assert_eq!(recv_text(&mut client).await, WELCOME_MESSAGE);
}

#[tokio::test]
async fn three_client_fan_out() {
    // A, B, C connect in order; A sends "hello": B and C each receive
    // exactly one copy, A receives nothing back.
    let addr = start_server().await;
    let mut a = connect(addr).await;
    assert_eq!(recv_text(&mut a).await, WELCOME_MESSAGE);
    let mut b = connect(addr).await;
    assert_eq!(recv_text(&mut b).await, WELCOME_MESSAGE);
    let mut c = connect(addr).await;
    assert_eq!(recv_text(&mut c).await, WELCOME_MESSAGE);

    a.send(Message::text("hello")).await.unwrap();

    assert_eq!(recv_text(&mut b).await, "hello");
    assert_eq!(recv_text(&mut c).await, "hello");
    assert_silent(&mut a).await;
    assert_silent(&mut b).await;
}

#[tokio::test]
async fn per_sender_order_is_preserved() {
    let addr = start_server().await;
    let mut a = connect(addr).await;
    let _ = recv_text(&mut a).await;
    let mut b = connect(addr).await;
    let _ = recv_text(&mut b).await;

    for i in 0..10 {
        a.send(Message::text(format!("msg-{i}"))).await.unwrap();
    }
    for i in 0..10 {
        assert_eq!(recv_text(&mut b).await, format!("msg-{i}"));
    }
}

#[tokio::test]
async fn binary_payloads_relay_verbatim() {
    let addr = start_server().await;
    let mut a = connect(addr).await;
    let _ = recv_text(&mut a).await;
    let mut b = connect(addr).await;
    let _ = recv_text(&mut b).await;

    let data = vec![0u8, 159, 146, 150];
    a.send(Message::binary(data.clone())).await.unwrap();

    let frame = timeout(RECV_TIMEOUT, b.next())
        .await
        .expect("timed out waiting for a frame")
        .expect("stream ended")
        .unwrap();
    let Message::Binary(received) = frame else {
        panic!("expected a binary frame, got {frame:?}");
    };
    assert_eq!(received.to_vec(), data);
}

#[tokio::test]
async fn closed_client_stops_receiving_broadcasts() {
    let addr = start_server().await;
    let mut a = connect(addr).await;
    let _ = recv_text(&mut a).await;
    let mut b = connect(addr).await;
    let _ = recv_text(&mut b).await;
    let mut c = connect(addr).await;
    let _ = recv_text(&mut c).await;

    b.close(None).await.unwrap();
    wait_for_connection_count(addr, 2).await;

    a.send(Message::text("after-close")).await.unwrap();
    assert_eq!(recv_text(&mut c).await, "after-close");
}

#[tokio::test]
async fn status_counts_connections() {
    let addr = start_server().await;
    wait_for_connection_count(addr, 0).await;

    let mut a = connect(addr).await;
    let _ = recv_text(&mut a).await;
    let mut b = connect(addr).await;
    let _ = recv_text(&mut b).await;
    wait_for_connection_count(addr, 2).await;

    drop(a);
    wait_for_connection_count(addr, 1).await;
}

#[tokio::test]
async fn health_endpoint_reports_healthy() {
    let addr = start_server().await;
    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn subscriber_receiver_consumes_published_messages() {
    let addr = start_server().await;
    let mut receiver = MessageReceiver::connect(&addr.to_string()).await;

    let mut producer = connect(addr).await;
    let _ = recv_text(&mut producer).await;
    producer
        .send(Message::text(
            r#"{"accountId":"acc-9","data":"login","timestamp":1700000000}"#,
        ))
        .await
        .unwrap();

    // The first frames include the welcome greeting, which is not an
    // account message; keep reading until one parses.
    let message = loop {
        let raw = timeout(RECV_TIMEOUT, receiver.next_payload())
            .await
            .expect("timed out waiting for a payload")
            .expect("publisher closed the connection");
        if let Some(message) = AccountMessage::parse(&raw) {
            break message;
        }
    };
    assert_eq!(message.account_id, "acc-9");
    assert_eq!(message.data, "login");
}
