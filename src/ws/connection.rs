//! Per-connection read/write loop.
//!
//! Each accepted socket is split: a writer task drains the connection's
//! bounded outbound queue into the sink while the read loop feeds inbound
//! data frames to the relay. A close frame or stream end finishes the
//! lifecycle; transport errors stay on this connection.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use crate::domain::{ClientConnection, ConnectionId, Payload};
use crate::service::RelayService;

/// Runs the full lifecycle of one client connection.
///
/// Invoked by the upgrade handler once the handshake has completed; returns
/// after the connection has closed and been removed from the registry.
pub async fn run_connection(socket: WebSocket, relay: Arc<RelayService>, queue_capacity: usize) {
    let (mut ws_tx, mut ws_rx) = socket.split();
    let (tx, mut rx) = mpsc::channel::<Payload>(queue_capacity);
    let connection = Arc::new(ClientConnection::new(ConnectionId::new(), tx));

    // Drains the outbound queue into the socket until either end goes away.
    let writer = tokio::spawn(async move {
        while let Some(payload) = rx.recv().await {
            if ws_tx.send(to_ws_message(payload)).await.is_err() {
                break;
            }
        }
        let _ = ws_tx.close().await;
    });

    relay.on_connect(Arc::clone(&connection)).await;

    loop {
        match ws_rx.next().await {
            Some(Ok(Message::Text(text))) => {
                relay
                    .on_message(&connection, Payload::Text(text.as_str().to_owned()))
                    .await;
            }
            Some(Ok(Message::Binary(data))) => {
                relay
                    .on_message(&connection, Payload::Binary(data.to_vec()))
                    .await;
            }
            // Ping/Pong are the transport layer's concern.
            Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
            Some(Ok(Message::Close(_))) | None => {
                relay.on_close(&connection).await;
                break;
            }
            Some(Err(error)) => {
                relay.on_error(&connection, &error).await;
                break;
            }
        }
    }

    // The registry no longer holds this connection; dropping our handle
    // closes the queue once any in-flight fan-out snapshot releases its
    // reference, and the writer exits.
    drop(connection);
    let _ = writer.await;
}

/// Converts a relay payload back into a WebSocket frame.
fn to_ws_message(payload: Payload) -> Message {
    match payload {
        Payload::Text(text) => Message::text(text),
        Payload::Binary(data) => Message::binary(data),
    }
}
