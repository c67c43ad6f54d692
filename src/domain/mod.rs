//! Domain layer: connection identity, lifecycle, payloads, and membership.
//!
//! This module contains the publisher's core model: the typed connection id,
//! the per-client connection handle with its lifecycle state machine, the
//! opaque payload unit, and the registry of currently open connections.

pub mod connection;
pub mod connection_id;
pub mod payload;
pub mod registry;

pub use connection::{ClientConnection, ConnectionState, SendOutcome};
pub use connection_id::ConnectionId;
pub use payload::Payload;
pub use registry::ConnectionRegistry;
