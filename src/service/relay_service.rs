//! Broadcast relay: connection lifecycle events and message fan-out.
//!
//! [`RelayService`] owns the [`ConnectionRegistry`] and implements the
//! publisher's entire contract: register on connect, greet the new client,
//! fan every inbound payload out to all other open connections, and remove
//! on close or error. Per-connection failures stay on the faulting
//! connection.

use std::sync::Arc;

use crate::domain::{ClientConnection, ConnectionRegistry, Payload, SendOutcome};

/// Greeting sent to a client immediately after registration, to that client
/// only.
pub const WELCOME_MESSAGE: &str = "Successfully connected to publisher";

/// The fan-out relay.
#[derive(Debug)]
pub struct RelayService {
    registry: Arc<ConnectionRegistry>,
}

impl RelayService {
    /// Creates a relay over the given registry.
    #[must_use]
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// The registry this relay owns.
    #[must_use]
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Handles a completed handshake: the connection becomes `Open`, joins
    /// the registry, and receives [`WELCOME_MESSAGE`].
    ///
    /// The greeting is the first item on the connection's outbound queue, so
    /// it always precedes any broadcast the connection later receives.
    pub async fn on_connect(&self, connection: Arc<ClientConnection>) {
        connection.mark_open();
        self.registry.add(Arc::clone(&connection)).await;
        tracing::info!(conn_id = %connection.id(), "client connected");

        if connection.send(Payload::from(WELCOME_MESSAGE)) == SendOutcome::Disconnected {
            // Writer vanished between handshake and greeting.
            self.on_close(&connection).await;
        }
    }

    /// Relays `payload` verbatim to every other currently open connection.
    ///
    /// Targets are snapshotted once, then re-checked for `Open` at send time
    /// so a registered-but-closing connection is skipped. A dead target is
    /// removed inline without aborting delivery to the rest; a slow target
    /// only loses this payload. Nothing is ever echoed back to the sender.
    pub async fn on_message(&self, sender: &ClientConnection, payload: Payload) {
        tracing::debug!(
            conn_id = %sender.id(),
            kind = payload.kind(),
            bytes = payload.len(),
            "message received"
        );

        let targets = self.registry.snapshot_except(sender.id()).await;
        for target in targets {
            if !target.is_open() {
                continue;
            }
            match target.send(payload.clone()) {
                SendOutcome::Queued => {}
                SendOutcome::Dropped => {
                    tracing::warn!(
                        conn_id = %target.id(),
                        dropped = target.dropped_count(),
                        "outbound queue full, payload dropped"
                    );
                }
                SendOutcome::Disconnected => {
                    tracing::warn!(conn_id = %target.id(), "send failed, dropping connection");
                    self.on_close(&target).await;
                }
            }
        }
    }

    /// Handles a closed transport.
    ///
    /// Removal happens exactly once; repeated close or error signals for the
    /// same connection are no-ops.
    pub async fn on_close(&self, connection: &ClientConnection) {
        if connection.close() {
            self.registry.remove(connection.id()).await;
            tracing::info!(conn_id = %connection.id(), "client disconnected");
        }
    }

    /// Handles a transport error: logged, then treated as a close. Never
    /// propagates past the faulting connection.
    pub async fn on_error(
        &self,
        connection: &ClientConnection,
        error: &(dyn std::fmt::Display + Send + Sync),
    ) {
        tracing::warn!(conn_id = %connection.id(), error = %error, "connection error");
        self.on_close(connection).await;
    }
}
