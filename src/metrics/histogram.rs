use hdrhistogram::Histogram;
use std::time::Duration;

use super::types::RequestResult;

/// Response-time histogram with microsecond resolution.
#[derive(Debug)]
pub struct LatencyHistogram {
    hist: Histogram<u64>,
}

impl LatencyHistogram {
    /// Create a new latency histogram.
    ///
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be created.
    pub fn new() -> Result<Self, String> {
        let hist = Histogram::<u64>::new(3)
            .map_err(|err| format!("Failed to create histogram: {}", err))?;
        Ok(Self { hist })
    }

    /// Record a response time.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be recorded.
    pub fn record(&mut self, elapsed: Duration) -> Result<(), String> {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX).max(1);
        self.hist
            .record(micros)
            .map_err(|err| format!("Failed to record latency: {}", err))
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.hist.len()
    }

    #[must_use]
    pub fn quantile(&self, quantile: f64) -> Duration {
        if self.count() == 0 {
            return Duration::ZERO;
        }
        Duration::from_micros(self.hist.value_at_quantile(quantile))
    }

    #[must_use]
    pub fn min(&self) -> Duration {
        if self.count() == 0 {
            return Duration::ZERO;
        }
        Duration::from_micros(self.hist.min())
    }

    #[must_use]
    pub fn max(&self) -> Duration {
        Duration::from_micros(self.hist.max())
    }
}

/// Response-time distribution of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencySummary {
    pub min: Duration,
    pub max: Duration,
    pub p50: Duration,
    pub p90: Duration,
    pub p99: Duration,
}

impl LatencySummary {
    /// Summarize the response times of `results`.
    ///
    /// # Errors
    ///
    /// Returns an error if the histogram cannot be built.
    pub fn from_results(results: &[RequestResult]) -> Result<Option<Self>, String> {
        if results.is_empty() {
            return Ok(None);
        }
        let mut histogram = LatencyHistogram::new()?;
        for result in results {
            histogram.record(result.elapsed)?;
        }
        Ok(Some(Self {
            min: histogram.min(),
            max: histogram.max(),
            p50: histogram.quantile(0.5),
            p90: histogram.quantile(0.9),
            p99: histogram.quantile(0.99),
        }))
    }
}
