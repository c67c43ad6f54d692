//! Publisher error types.
//!
//! [`PublisherError`] covers the only failures that may stop the process:
//! configuration parsing and the initial bind. Per-connection failures
//! never surface here; they are handled where they occur and stay on the
//! faulting connection.

use std::net::AddrParseError;

/// Fatal startup errors.
#[derive(Debug, thiserror::Error)]
pub enum PublisherError {
    /// `LISTEN_ADDR` could not be parsed as a socket address.
    #[error("invalid listen address: {0}")]
    InvalidListenAddr(#[from] AddrParseError),

    /// The listening socket could not be bound.
    #[error("failed to bind listener: {0}")]
    Bind(#[source] std::io::Error),
}
