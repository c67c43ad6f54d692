//! Per-client connection handle and lifecycle state.
//!
//! A [`ClientConnection`] pairs a connection id with the bounded outbound
//! queue drained by that socket's writer task. Lifecycle transitions are
//! monotonic: `Connecting → Open → Closing → Closed`; a connection never
//! reopens.

use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::ConnectionId;
use super::Payload;

/// Lifecycle state of a client connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ConnectionState {
    /// Transport handshake in progress; not yet a fan-out target.
    Connecting = 0,
    /// Handshake complete and registered; eligible for fan-out.
    Open = 1,
    /// Close initiated (either side) but not yet finalized.
    Closing = 2,
    /// Terminal. The first transition into this state triggers registry
    /// removal.
    Closed = 3,
}

impl ConnectionState {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Connecting,
            1 => Self::Open,
            2 => Self::Closing,
            _ => Self::Closed,
        }
    }
}

/// Outcome of queueing a payload for delivery to one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Accepted onto the outbound queue.
    Queued,
    /// Queue full: the payload was dropped for this slow consumer.
    Dropped,
    /// The writer task is gone; the connection is dead.
    Disconnected,
}

/// A connected client.
///
/// Holds the send half of the connection's outbound queue; the receive half
/// lives in the socket's writer task. Sends never block: a full queue drops
/// the payload, a closed queue reports the connection as dead.
#[derive(Debug)]
pub struct ClientConnection {
    id: ConnectionId,
    tx: mpsc::Sender<Payload>,
    state: AtomicU8,
    dropped: AtomicU64,
}

impl ClientConnection {
    /// Creates a connection in the `Connecting` state.
    #[must_use]
    pub fn new(id: ConnectionId, tx: mpsc::Sender<Payload>) -> Self {
        Self {
            id,
            tx,
            state: AtomicU8::new(ConnectionState::Connecting as u8),
            dropped: AtomicU64::new(0),
        }
    }

    /// Unique connection id.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Marks the handshake complete. No effect once closing or closed.
    pub fn mark_open(&self) {
        let _ = self.state.compare_exchange(
            ConnectionState::Connecting as u8,
            ConnectionState::Open as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// Returns `true` while the connection is a valid fan-out target.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Begins closing; send-time checks skip the connection from here on.
    pub fn begin_close(&self) {
        let _ = self
            .state
            .fetch_max(ConnectionState::Closing as u8, Ordering::AcqRel);
    }

    /// Finalizes the lifecycle.
    ///
    /// Returns `true` only for the call that first reaches `Closed`, so
    /// registry removal happens exactly once no matter how many close or
    /// error signals arrive.
    pub fn close(&self) -> bool {
        self.state.swap(ConnectionState::Closed as u8, Ordering::AcqRel)
            != ConnectionState::Closed as u8
    }

    /// Queues a payload for delivery without blocking.
    pub fn send(&self, payload: Payload) -> SendOutcome {
        match self.tx.try_send(payload) {
            Ok(()) => SendOutcome::Queued,
            Err(TrySendError::Full(_)) => {
                let _ = self.dropped.fetch_add(1, Ordering::Relaxed);
                SendOutcome::Dropped
            }
            Err(TrySendError::Closed(_)) => SendOutcome::Disconnected,
        }
    }

    /// Payloads dropped so far because the queue was full.
    #[must_use]
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
