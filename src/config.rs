//! Publisher configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;

use crate::error::PublisherError;

/// Top-level publisher configuration.
///
/// Loaded once at startup via [`PublisherConfig::from_env`].
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Socket address to bind the server to (e.g. `0.0.0.0:8000`).
    pub listen_addr: SocketAddr,

    /// Capacity of each connection's outbound payload queue. A client that
    /// cannot drain its queue this far behind starts losing payloads.
    pub outbound_queue_capacity: usize,
}

impl PublisherConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`PublisherError::InvalidListenAddr`] if `LISTEN_ADDR` is set
    /// but cannot be parsed as a [`SocketAddr`].
    pub fn from_env() -> Result<Self, PublisherError> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()?;

        // A zero-capacity queue cannot exist; clamp to at least one slot.
        let outbound_queue_capacity = parse_env("OUTBOUND_QUEUE_CAPACITY", 256).max(1);

        Ok(Self {
            listen_addr,
            outbound_queue_capacity,
        })
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
