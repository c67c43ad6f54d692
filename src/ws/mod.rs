//! WebSocket layer: upgrade handling and the per-connection loop.
//!
//! The WebSocket endpoint at `/ws` is the publisher's transport boundary:
//! each accepted socket becomes a persistent bidirectional message channel
//! driven by [`connection::run_connection`].

pub mod connection;
pub mod handler;
