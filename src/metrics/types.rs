use std::fmt;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Serialize, Serializer};

/// Status recorded when no HTTP response was received at all.
pub const TRANSPORT_FAILURE_STATUS: u16 = 0;
/// The only status code counted as a success.
pub const SUCCESS_STATUS: u16 = 200;

/// Outcome of one executed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestResult {
    pub index: u64,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub status_code: u16,
    pub body: Option<String>,
    #[serde(rename = "response_time", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    pub is_error: bool,
    pub timed_out: bool,
    pub transport_error: bool,
    pub error: Option<String>,
}

impl RequestResult {
    /// A request that produced an HTTP response with `status_code`.
    #[must_use]
    pub fn response(
        index: u64,
        started_at: DateTime<Utc>,
        elapsed: Duration,
        status_code: u16,
        body: Option<String>,
    ) -> Self {
        Self {
            index,
            started_at,
            ended_at: end_of(started_at, elapsed),
            status_code,
            body,
            elapsed,
            is_error: status_code != SUCCESS_STATUS,
            timed_out: false,
            transport_error: false,
            error: None,
        }
    }

    /// A request that failed before a complete response arrived.
    #[must_use]
    pub fn transport_failure(
        index: u64,
        started_at: DateTime<Utc>,
        elapsed: Duration,
        timed_out: bool,
        error: String,
    ) -> Self {
        Self {
            index,
            started_at,
            ended_at: end_of(started_at, elapsed),
            status_code: TRANSPORT_FAILURE_STATUS,
            body: None,
            elapsed,
            is_error: true,
            timed_out,
            transport_error: !timed_out,
            error: Some(error),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        !self.is_error
    }
}

fn end_of(started_at: DateTime<Utc>, elapsed: Duration) -> DateTime<Utc> {
    TimeDelta::from_std(elapsed)
        .ok()
        .and_then(|delta| started_at.checked_add_signed(delta))
        .unwrap_or(started_at)
}

/// Running statistics over every result recorded so far.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RunStatistics {
    pub total_requests: u64,
    pub successful_requests: u64,
    #[serde(serialize_with = "serialize_secs")]
    pub span: Duration,
    /// `None` until the observed span is non-zero.
    pub requests_per_second: Option<f64>,
    #[serde(serialize_with = "serialize_secs")]
    pub avg_response_time: Duration,
    pub error_rate: f64,
}

impl RunStatistics {
    #[must_use]
    pub const fn error_requests(&self) -> u64 {
        self.total_requests.saturating_sub(self.successful_requests)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AbortReason {
    ErrorRateExceeded { error_rate: f64, threshold: f64 },
    Cancelled,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::ErrorRateExceeded {
                error_rate,
                threshold,
            } => write!(
                f,
                "error rate {:.2}% exceeded the {:.0}% threshold",
                error_rate * 100.0,
                threshold * 100.0
            ),
            AbortReason::Cancelled => f.write_str("cancelled by user"),
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "state", content = "reason", rename_all = "snake_case")]
pub enum Termination {
    Completed,
    Aborted(AbortReason),
}

impl Termination {
    #[must_use]
    pub const fn abort_reason(&self) -> Option<AbortReason> {
        match self {
            Termination::Completed => None,
            Termination::Aborted(reason) => Some(*reason),
        }
    }
}

/// Terminal record of a finished run. Results are serialized separately
/// by the exporters.
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub requested: u64,
    pub termination: Termination,
    pub statistics: RunStatistics,
    #[serde(skip)]
    pub results: Vec<RequestResult>,
}

impl RunOutcome {
    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        matches!(self.termination, Termination::Aborted(_))
    }

    #[must_use]
    pub fn completed(&self) -> u64 {
        u64::try_from(self.results.len()).unwrap_or(u64::MAX)
    }
}

fn serialize_secs<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(value.as_secs_f64())
}
