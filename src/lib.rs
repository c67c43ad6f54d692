//! # pubsub-publisher
//!
//! WebSocket fan-out publisher for a lightweight pub/sub relay, with a
//! companion subscriber CLI.
//!
//! Any message a connected client sends is rebroadcast verbatim to every
//! other connected client. There is no routing, persistence, or protocol
//! beyond "relay everything to everyone else"; payloads are opaque.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket)
//!     │
//!     ├── WS upgrade + per-connection loop (ws/)
//!     ├── System endpoints (api/)
//!     │
//!     ├── RelayService (service/)
//!     │
//!     └── ConnectionRegistry (domain/)
//!
//! subscriber CLI (client/) ──ws──▶ publisher
//! ```

pub mod api;
pub mod app_state;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
