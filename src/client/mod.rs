//! Subscriber client: connects to the publisher and consumes the stream.
//!
//! The subscriber dials the publisher's `/ws` endpoint, parses account
//! messages off the relay, applies an optional account filter, and either
//! prints each message or reports aggregated counts on an interval.

pub mod message;
pub mod pipeline;
pub mod receiver;

pub use message::AccountMessage;
pub use pipeline::{AccountFilter, MessageAggregator};
pub use receiver::MessageReceiver;
