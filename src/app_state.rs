//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::PublisherConfig;
use crate::service::RelayService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The broadcast relay and its connection registry.
    pub relay: Arc<RelayService>,
    /// Startup configuration (read-only after boot).
    pub config: PublisherConfig,
}
