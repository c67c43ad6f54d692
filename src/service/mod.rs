//! Service layer: the broadcast relay.
//!
//! [`RelayService`] coordinates the connection lifecycle and message
//! fan-out over the [`crate::domain::ConnectionRegistry`].

pub mod relay_service;

pub use relay_service::{RelayService, WELCOME_MESSAGE};
