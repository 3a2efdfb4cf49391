use std::time::Duration;

use chrono::{DateTime, Utc};

use super::types::{RequestResult, RunStatistics};

/// Owns the ordered result sequence of one run and keeps its statistics
/// current in O(1) per appended result.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    results: Vec<RequestResult>,
    tally: Tally,
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    count: u64,
    successes: u64,
    elapsed_nanos: u128,
    first_start: Option<DateTime<Utc>>,
    last_end: Option<DateTime<Utc>>,
}

impl Tally {
    fn record(&mut self, result: &RequestResult) {
        self.count = self.count.saturating_add(1);
        if result.is_success() {
            self.successes = self.successes.saturating_add(1);
        }
        self.elapsed_nanos = self.elapsed_nanos.saturating_add(result.elapsed.as_nanos());
        self.first_start = Some(
            self.first_start
                .map_or(result.started_at, |start| start.min(result.started_at)),
        );
        self.last_end = Some(
            self.last_end
                .map_or(result.ended_at, |end| end.max(result.ended_at)),
        );
    }

    fn statistics(&self) -> RunStatistics {
        let span = match (self.first_start, self.last_end) {
            (Some(start), Some(end)) => end
                .signed_duration_since(start)
                .to_std()
                .unwrap_or(Duration::ZERO),
            _ => Duration::ZERO,
        };
        build_statistics(self.count, self.successes, self.elapsed_nanos, span)
    }
}

impl ResultAggregator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            results: Vec::with_capacity(capacity),
            tally: Tally::default(),
        }
    }

    /// Appends `result` and returns the updated statistics.
    pub fn append(&mut self, result: RequestResult) -> RunStatistics {
        self.tally.record(&result);
        self.results.push(result);
        self.tally.statistics()
    }

    #[must_use]
    pub fn statistics(&self) -> RunStatistics {
        self.tally.statistics()
    }

    #[must_use]
    pub fn results(&self) -> &[RequestResult] {
        &self.results
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    #[must_use]
    pub fn into_results(self) -> Vec<RequestResult> {
        self.results
    }
}

/// Computes statistics for `results` from scratch.
#[must_use]
pub fn recompute(results: &[RequestResult]) -> RunStatistics {
    let count = u64::try_from(results.len()).unwrap_or(u64::MAX);
    let successes = u64::try_from(results.iter().filter(|result| result.is_success()).count())
        .unwrap_or(u64::MAX);
    let elapsed_nanos = results
        .iter()
        .map(|result| result.elapsed.as_nanos())
        .fold(0u128, u128::saturating_add);
    let first_start = results.iter().map(|result| result.started_at).min();
    let last_end = results.iter().map(|result| result.ended_at).max();
    let span = match (first_start, last_end) {
        (Some(start), Some(end)) => end
            .signed_duration_since(start)
            .to_std()
            .unwrap_or(Duration::ZERO),
        _ => Duration::ZERO,
    };
    build_statistics(count, successes, elapsed_nanos, span)
}

fn build_statistics(count: u64, successes: u64, elapsed_nanos: u128, span: Duration) -> RunStatistics {
    if count == 0 {
        return RunStatistics::default();
    }

    let avg_nanos = elapsed_nanos.checked_div(u128::from(count)).unwrap_or(0);
    let avg_response_time = Duration::from_nanos(u64::try_from(avg_nanos).unwrap_or(u64::MAX));
    let errors = count.saturating_sub(successes);
    let error_rate = (errors as f64 / count as f64).clamp(0.0, 1.0);
    let requests_per_second = if span.is_zero() {
        None
    } else {
        Some(count as f64 / span.as_secs_f64())
    };

    RunStatistics {
        total_requests: count,
        successful_requests: successes,
        span,
        requests_per_second,
        avg_response_time,
        error_rate,
    }
}
