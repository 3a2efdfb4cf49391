use crate::metrics::RunStatistics;

/// Requests (by 0-based index) that can never trigger an abort.
pub const WARMUP_REQUESTS: u64 = 5;
/// Error rate that must be strictly exceeded to abort.
pub const ERROR_RATE_THRESHOLD: f64 = 0.5;

/// Circuit breaker evaluated after every completed request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AbortPolicy {
    warmup: u64,
    threshold: f64,
}

impl Default for AbortPolicy {
    fn default() -> Self {
        Self {
            warmup: WARMUP_REQUESTS,
            threshold: ERROR_RATE_THRESHOLD,
        }
    }
}

impl AbortPolicy {
    #[must_use]
    pub const fn threshold(&self) -> f64 {
        self.threshold
    }

    /// True once the request at `index` is past warm-up and the running
    /// error rate is above the threshold.
    #[must_use]
    pub fn should_abort(&self, index: u64, statistics: &RunStatistics) -> bool {
        index >= self.warmup && statistics.error_rate > self.threshold
    }
}
