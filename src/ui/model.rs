use std::time::Duration;

use crate::metrics::{RunStatistics, Termination};
use crate::run::RunSample;

/// Snapshot of the run shown by the dashboard.
#[derive(Debug, Clone, Default)]
pub struct UiData {
    /// Method and URL, e.g. `GET http://localhost:8000/`.
    pub target: String,
    pub requested: u64,
    pub statistics: RunStatistics,
    /// `(request index, response time in ms)` for every result so far.
    pub latencies: Vec<(u64, f64)>,
    pub last_status: Option<u16>,
    pub termination: Option<Termination>,
    pub no_color: bool,
}

/// One bar of the response-time distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyBucket {
    pub label: String,
    pub count: u64,
}

impl UiData {
    #[must_use]
    pub fn new(target: String, requested: u64, no_color: bool) -> Self {
        Self {
            target,
            requested,
            latencies: Vec::with_capacity(usize::try_from(requested).unwrap_or_default()),
            no_color,
            ..Self::default()
        }
    }

    pub fn apply(&mut self, sample: &RunSample) {
        self.statistics = sample.statistics;
        self.last_status = Some(sample.result.status_code);
        self.latencies
            .push((sample.result.index, duration_ms(sample.result.elapsed)));
    }

    pub fn finish(&mut self, termination: Termination) {
        self.termination = Some(termination);
    }

    /// Completed fraction of the requested count, in `0.0..=1.0`.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.requested == 0 {
            return 0.0;
        }
        (self.statistics.total_requests as f64 / self.requested as f64).clamp(0.0, 1.0)
    }

    /// Splits the observed response times into `buckets` equal-width bins.
    #[must_use]
    pub fn latency_buckets(&self, buckets: usize) -> Vec<LatencyBucket> {
        if self.latencies.is_empty() || buckets == 0 {
            return Vec::new();
        }
        let (min, max) = self
            .latencies
            .iter()
            .fold((f64::MAX, f64::MIN), |(min, max), (_, ms)| {
                (min.min(*ms), max.max(*ms))
            });
        let width = ((max - min) / buckets as f64).max(f64::EPSILON);

        let mut counts = vec![0_u64; buckets];
        for (_, ms) in &self.latencies {
            let slot = (((ms - min) / width) as usize).min(buckets.saturating_sub(1));
            if let Some(count) = counts.get_mut(slot) {
                *count = count.saturating_add(1);
            }
        }

        counts
            .into_iter()
            .enumerate()
            .map(|(slot, count)| LatencyBucket {
                label: format!("{:.0}", min + width * slot as f64),
                count,
            })
            .collect()
    }
}

fn duration_ms(value: Duration) -> f64 {
    value.as_secs_f64() * 1_000.0
}
