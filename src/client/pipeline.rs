//! Subscriber-side message pipeline: filtering and aggregation.
//!
//! Parsed account messages either print as they arrive or feed per-account
//! counters reported on a fixed interval.

use std::collections::HashMap;

use super::message::AccountMessage;

/// Optional exact-match account filter.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    account_id: Option<String>,
}

impl AccountFilter {
    /// Creates a filter. `None` or an empty id passes every message.
    #[must_use]
    pub fn new(account_id: Option<String>) -> Self {
        Self {
            account_id: account_id.filter(|id| !id.is_empty()),
        }
    }

    /// Returns `true` if the message passes the filter.
    #[must_use]
    pub fn matches(&self, message: &AccountMessage) -> bool {
        self.account_id
            .as_deref()
            .is_none_or(|id| id == message.account_id)
    }
}

/// Per-account message counters.
#[derive(Debug, Default)]
pub struct MessageAggregator {
    counts: HashMap<String, u64>,
}

impl MessageAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one message.
    pub fn record(&mut self, message: &AccountMessage) {
        *self.counts.entry(message.account_id.clone()).or_insert(0) += 1;
    }

    /// Logs the per-account totals gathered so far.
    pub fn report(&self) {
        tracing::info!("aggregated messages received per account");
        for (account_id, count) in &self.counts {
            tracing::info!(account_id = %account_id, messages = count, "account total");
        }
    }

    /// Number of distinct accounts seen.
    #[must_use]
    pub fn account_count(&self) -> usize {
        self.counts.len()
    }

    /// Total recorded for one account.
    #[must_use]
    pub fn count_for(&self, account_id: &str) -> u64 {
        self.counts.get(account_id).copied().unwrap_or(0)
    }
}
