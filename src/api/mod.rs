//! HTTP API layer: system route composition.
//!
//! The publisher's HTTP surface is deliberately small: the WebSocket
//! upgrade at `/ws` plus the system endpoints mounted at the root.

pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Builds the router with all system endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new().merge(system::routes())
}
