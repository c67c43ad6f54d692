//! Subscriber CLI entry point.
//!
//! Connects to a publisher and prints, or aggregates, the account messages
//! relayed to it.

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use pubsub_publisher::client::{AccountFilter, AccountMessage, MessageAggregator, MessageReceiver};

/// Consumes account messages from a publisher.
#[derive(Debug, Parser)]
#[command(name = "subscriber", version, about)]
struct Args {
    /// Publisher address (host:port).
    #[arg(long, default_value = "0.0.0.0:8000")]
    addr: String,

    /// Only show messages for this account id.
    #[arg(long)]
    filter: Option<String>,

    /// Report aggregated per-account counts instead of each message.
    #[arg(long)]
    agg: bool,

    /// Seconds between aggregated reports (with --agg).
    #[arg(long, default_value_t = 3)]
    agg_freq: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    tracing::info!(addr = %args.addr, "connecting to publisher");
    let mut receiver = MessageReceiver::connect(&args.addr).await;

    let filter = AccountFilter::new(args.filter);
    let mut aggregator = MessageAggregator::new();
    let mut report_tick = tokio::time::interval(Duration::from_secs(args.agg_freq.max(1)));
    // The first tick completes immediately; consume it so reports start one
    // full interval in.
    report_tick.tick().await;

    loop {
        tokio::select! {
            payload = receiver.next_payload() => {
                let Some(raw) = payload else {
                    tracing::info!("publisher closed the connection");
                    break;
                };
                let Some(message) = AccountMessage::parse(&raw) else {
                    continue;
                };
                if !filter.matches(&message) {
                    continue;
                }
                if args.agg {
                    aggregator.record(&message);
                } else {
                    tracing::info!(
                        account_id = %message.account_id,
                        data = %message.data,
                        time = %message.rfc3339_timestamp(),
                        "received account message"
                    );
                }
            }
            _ = report_tick.tick(), if args.agg => {
                aggregator.report();
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(error) = result {
                    tracing::warn!(error = %error, "ctrl-c handler failed");
                }
                receiver.close().await;
                break;
            }
        }
    }

    Ok(())
}
