//! Account message model.
//!
//! Producers publish JSON objects carrying an account id, free-form data,
//! and a unix timestamp. The relay itself never looks inside a payload;
//! only the subscriber parses it.

use serde::{Deserialize, Serialize};

/// One account event as carried over the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountMessage {
    /// Account the event belongs to.
    pub account_id: String,
    /// Free-form event data.
    pub data: String,
    /// Unix timestamp (seconds) of when the event was produced.
    pub timestamp: i64,
}

impl AccountMessage {
    /// Parses a raw relay payload.
    ///
    /// Returns `None` for frames that are not account messages, such as the
    /// publisher's welcome greeting; those are simply skipped.
    #[must_use]
    pub fn parse(raw: &[u8]) -> Option<Self> {
        serde_json::from_slice(raw).ok()
    }

    /// Event time as an RFC 3339 string, or the raw number when the
    /// timestamp is out of range.
    #[must_use]
    pub fn rfc3339_timestamp(&self) -> String {
        chrono::DateTime::from_timestamp(self.timestamp, 0)
            .map_or_else(|| self.timestamp.to_string(), |dt| dt.to_rfc3339())
    }
}
