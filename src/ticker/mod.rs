//! Ticker data model and payload transformer
//!
//! Normalizes raw upstream per-asset fields into the snapshot shape all
//! consumers (cache, envelope, broadcast) share.

mod fallback;
mod transform;
mod types;

pub use fallback::fallback_snapshot;
pub use transform::{derived_range, sentiment_for, transform, transform_with_rng};
pub use types::{Sentiment, Snapshot, Ticker};
