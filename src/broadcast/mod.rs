//! Snapshot fan-out to live subscribers
//!
//! The broadcaster serializes one typed frame per fresh snapshot and
//! delivers it to every registered subscriber. Per-subscriber failures are
//! isolated: a closed or saturated connection never affects delivery to the
//! rest.

mod registry;

pub use registry::SubscriberRegistry;

use crate::telemetry;
use crate::ticker::Snapshot;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::mpsc::error::TrySendError;

/// Message type tag consumers dispatch on
pub const PRICE_MESSAGE_TYPE: &str = "crypto_prices";

/// Wire frame sent to subscribers on every fresh snapshot
#[derive(Debug, Serialize)]
struct PriceFrame<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: &'a Snapshot,
    timestamp: DateTime<Utc>,
}

/// Fans fresh snapshots out to the subscriber registry
///
/// Holds the registry as an injected dependency; the transport layer owns
/// subscriber lifecycles (register on accept, unregister on close).
#[derive(Clone)]
pub struct Broadcaster {
    registry: Arc<SubscriberRegistry>,
}

impl Broadcaster {
    /// Create a broadcaster over the given registry
    pub fn new(registry: Arc<SubscriberRegistry>) -> Self {
        Self { registry }
    }

    /// Serialize a price frame for the given snapshot
    pub fn price_frame(snapshot: &Snapshot, timestamp: DateTime<Utc>) -> String {
        let frame = PriceFrame {
            kind: PRICE_MESSAGE_TYPE,
            data: snapshot,
            timestamp,
        };
        // PriceFrame contains only serializable primitives
        serde_json::to_string(&frame).unwrap_or_else(|_| String::from("{}"))
    }

    /// Deliver a snapshot to every open subscriber, returning how many
    /// received it
    ///
    /// Serializes once; closed subscribers are pruned, saturated ones are
    /// skipped for this frame.
    pub async fn broadcast(&self, snapshot: &Snapshot, timestamp: DateTime<Utc>) -> usize {
        let frame = Self::price_frame(snapshot, timestamp);
        let subscribers = self.registry.senders().await;

        let mut delivered = 0;
        for (id, tx) in subscribers {
            match tx.try_send(frame.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(subscriber = %id, "Subscriber gone, pruning");
                    self.registry.unregister(&id).await;
                }
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(subscriber = %id, "Subscriber buffer full, skipping frame");
                }
            }
        }

        telemetry::record_broadcast(delivered);
        tracing::debug!(
            delivered,
            tickers = snapshot.len(),
            "Broadcast snapshot to subscribers"
        );
        delivered
    }

    /// Current subscriber count
    pub async fn subscriber_count(&self) -> usize {
        self.registry.len().await
    }
}
