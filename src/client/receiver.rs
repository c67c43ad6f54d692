//! Reconnecting WebSocket receiver for the subscriber.
//!
//! Dials the publisher with an infinite retry loop, yields raw data frames,
//! and redials when a mid-stream read fails. Shutdown is explicit: a close
//! frame is sent before the socket is dropped.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

/// Delay between dial attempts.
const RETRY_DELAY: Duration = Duration::from_secs(3);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// WebSocket message source with automatic redial.
#[derive(Debug)]
pub struct MessageReceiver {
    url: String,
    stream: WsStream,
}

impl MessageReceiver {
    /// Connects to the publisher's `/ws` endpoint at `addr` (`host:port`),
    /// retrying every few seconds until the dial succeeds.
    pub async fn connect(addr: &str) -> Self {
        let url = format!("ws://{addr}/ws");
        let stream = dial(&url).await;
        Self { url, stream }
    }

    /// Next raw data frame.
    ///
    /// Control frames are skipped. On a read error the receiver redials and
    /// resumes. Returns `None` once the publisher closes the connection.
    pub async fn next_payload(&mut self) -> Option<Vec<u8>> {
        loop {
            match self.stream.next().await {
                Some(Ok(Message::Text(text))) => return Some(text.as_bytes().to_vec()),
                Some(Ok(Message::Binary(data))) => return Some(data.to_vec()),
                Some(Ok(Message::Close(_))) => return None,
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    tracing::warn!(error = %error, "read failed, reconnecting");
                    self.stream = dial(&self.url).await;
                }
                None => return None,
            }
        }
    }

    /// Sends a close frame and drops the connection.
    pub async fn close(&mut self) {
        if let Err(error) = self.stream.close(None).await {
            tracing::debug!(error = %error, "close frame not delivered");
        }
    }
}

/// Dials `url` until it succeeds.
async fn dial(url: &str) -> WsStream {
    loop {
        match connect_async(url).await {
            Ok((stream, _)) => {
                tracing::info!(url, "connected to publisher");
                return stream;
            }
            Err(error) => {
                tracing::warn!(url, error = %error, "connect failed, retrying");
                tokio::time::sleep(RETRY_DELAY).await;
            }
        }
    }
}
