//! Per-policy resilience metrics: interval-merging downtime computation
//! and aggregation of `Incident`s over a fixed horizon.

mod compute;
mod interval;

pub use compute::compute;
pub use interval::{merge_intervals, total_length};
