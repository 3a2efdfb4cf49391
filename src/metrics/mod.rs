//! Per-request results, running statistics, and run outcomes.
mod aggregator;
mod histogram;
mod types;

#[cfg(test)]
mod tests;

pub use aggregator::{ResultAggregator, recompute};
pub use histogram::{LatencyHistogram, LatencySummary};
pub use types::{
    AbortReason, RequestResult, RunOutcome, RunStatistics, SUCCESS_STATUS,
    TRANSPORT_FAILURE_STATUS, Termination,
};
