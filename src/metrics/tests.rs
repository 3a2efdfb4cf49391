use super::*;
use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use std::time::Duration;

const BASE_TIMESTAMP_SECS: i64 = 1_700_000_000;

fn base_time() -> AppResult<DateTime<Utc>> {
    DateTime::from_timestamp(BASE_TIMESTAMP_SECS, 0)
        .ok_or_else(|| AppError::validation("Invalid base timestamp"))
}

fn at_offset(offset: Duration) -> AppResult<DateTime<Utc>> {
    let delta = chrono::TimeDelta::from_std(offset)
        .map_err(|err| AppError::validation(format!("Offset out of range: {}", err)))?;
    base_time()?
        .checked_add_signed(delta)
        .ok_or_else(|| AppError::validation("Offset overflow"))
}

/// Back-to-back results starting at the base time.
fn sequential_results(statuses: &[u16], elapsed: Duration) -> AppResult<Vec<RequestResult>> {
    let mut results = Vec::with_capacity(statuses.len());
    let mut offset = Duration::ZERO;
    for (index, status) in statuses.iter().enumerate() {
        let index = u64::try_from(index).map_err(|err| AppError::validation(err.to_string()))?;
        results.push(RequestResult::response(
            index,
            at_offset(offset)?,
            elapsed,
            *status,
            Some("{}".to_owned()),
        ));
        offset = offset.saturating_add(elapsed);
    }
    Ok(results)
}

fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}

#[test]
fn end_is_start_plus_elapsed() -> AppResult<()> {
    let elapsed = Duration::from_micros(123_457);
    let result = RequestResult::response(0, base_time()?, elapsed, 200, None);
    let measured = result
        .ended_at
        .signed_duration_since(result.started_at)
        .to_std()
        .map_err(|err| AppError::validation(err.to_string()))?;
    if measured != elapsed {
        return Err(AppError::validation(format!(
            "Expected {:?}, got {:?}",
            elapsed, measured
        )));
    }
    Ok(())
}

#[test]
fn transport_failure_uses_sentinel_status() -> AppResult<()> {
    let result = RequestResult::transport_failure(
        0,
        base_time()?,
        Duration::from_secs(30),
        true,
        "operation timed out".to_owned(),
    );
    if result.status_code != TRANSPORT_FAILURE_STATUS {
        return Err(AppError::validation("Expected sentinel status"));
    }
    if !result.is_error || !result.timed_out || result.transport_error {
        return Err(AppError::validation("Unexpected failure flags"));
    }
    if result.body.is_some() {
        return Err(AppError::validation("Expected no body on transport failure"));
    }
    Ok(())
}

#[test]
fn non_200_status_is_error() -> AppResult<()> {
    let created = RequestResult::response(0, base_time()?, Duration::from_millis(5), 201, None);
    let server_error = RequestResult::response(1, base_time()?, Duration::from_millis(5), 500, None);
    if !created.is_error || !server_error.is_error {
        return Err(AppError::validation("Only status 200 counts as success"));
    }
    Ok(())
}

#[test]
fn all_successful_requests_report_expected_statistics() -> AppResult<()> {
    let results = sequential_results(&[200; 10], Duration::from_millis(100))?;
    let mut aggregator = ResultAggregator::new();
    let mut stats = RunStatistics::default();
    for result in results {
        stats = aggregator.append(result);
    }

    if stats.total_requests != 10 || stats.successful_requests != 10 {
        return Err(AppError::validation(format!("Unexpected counts: {:?}", stats)));
    }
    if stats.error_rate > 0.0 {
        return Err(AppError::validation("Expected zero error rate"));
    }
    if stats.avg_response_time != Duration::from_millis(100) {
        return Err(AppError::validation(format!(
            "Unexpected average: {:?}",
            stats.avg_response_time
        )));
    }
    if stats.span != Duration::from_secs(1) {
        return Err(AppError::validation(format!("Unexpected span: {:?}", stats.span)));
    }
    match stats.requests_per_second {
        Some(rps) if approx_eq(rps, 10.0) => Ok(()),
        other => Err(AppError::validation(format!("Unexpected rps: {:?}", other))),
    }
}

#[test]
fn error_rate_counts_every_non_200() -> AppResult<()> {
    let results = sequential_results(
        &[200, 200, 200, 200, 200, 200, 500, 500, 404, 0],
        Duration::from_millis(10),
    )?;
    let stats = recompute(&results);
    if !approx_eq(stats.error_rate, 0.4) {
        return Err(AppError::validation(format!(
            "Expected 0.4, got {}",
            stats.error_rate
        )));
    }
    if stats.error_requests() != 4 {
        return Err(AppError::validation("Expected four errors"));
    }
    Ok(())
}

#[test]
fn zero_span_omits_requests_per_second() -> AppResult<()> {
    let mut aggregator = ResultAggregator::new();
    let stats = aggregator.append(RequestResult::response(
        0,
        base_time()?,
        Duration::ZERO,
        200,
        None,
    ));
    if stats.requests_per_second.is_some() {
        return Err(AppError::validation("rps must be omitted while span is zero"));
    }
    if stats.total_requests != 1 {
        return Err(AppError::validation("Expected one request"));
    }
    Ok(())
}

#[test]
fn single_request_span_is_its_own_elapsed() -> AppResult<()> {
    let mut aggregator = ResultAggregator::new();
    let stats = aggregator.append(RequestResult::response(
        0,
        base_time()?,
        Duration::from_millis(250),
        200,
        None,
    ));
    if stats.span != Duration::from_millis(250) {
        return Err(AppError::validation(format!("Unexpected span: {:?}", stats.span)));
    }
    match stats.requests_per_second {
        Some(rps) if approx_eq(rps, 4.0) => Ok(()),
        other => Err(AppError::validation(format!("Unexpected rps: {:?}", other))),
    }
}

#[test]
fn empty_statistics_are_zeroed() -> AppResult<()> {
    let stats = recompute(&[]);
    if stats != RunStatistics::default() {
        return Err(AppError::validation("Expected default statistics"));
    }
    if ResultAggregator::new().statistics() != stats {
        return Err(AppError::validation("Empty aggregator should match recompute"));
    }
    Ok(())
}

#[test]
fn incremental_statistics_match_recomputation() -> AppResult<()> {
    let statuses = [200, 500, 200, 0, 200, 503, 200, 200, 302, 200, 200, 500];
    let elapsed_ms = [12_u64, 250, 3, 30_000, 87, 1, 120, 45, 9, 410, 66, 18];
    let mut aggregator = ResultAggregator::with_capacity(statuses.len());
    let mut offset = Duration::ZERO;

    for (index, (status, millis)) in statuses.iter().zip(elapsed_ms.iter()).enumerate() {
        let index = u64::try_from(index).map_err(|err| AppError::validation(err.to_string()))?;
        let elapsed = Duration::from_millis(*millis);
        let started_at = at_offset(offset)?;
        let result = if *status == TRANSPORT_FAILURE_STATUS {
            RequestResult::transport_failure(index, started_at, elapsed, true, "timeout".to_owned())
        } else {
            RequestResult::response(index, started_at, elapsed, *status, None)
        };
        let incremental = aggregator.append(result);
        let from_scratch = recompute(aggregator.results());
        if incremental != from_scratch {
            return Err(AppError::validation(format!(
                "Mismatch at {}: {:?} vs {:?}",
                index, incremental, from_scratch
            )));
        }
        if !(0.0..=1.0).contains(&incremental.error_rate) {
            return Err(AppError::validation("Error rate out of range"));
        }
        offset = offset
            .saturating_add(elapsed)
            .saturating_add(Duration::from_millis(2));
    }

    if aggregator.len() != statuses.len() {
        return Err(AppError::validation("Results were dropped"));
    }
    let indices: Vec<u64> = aggregator.results().iter().map(|result| result.index).collect();
    if !indices.windows(2).all(|pair| matches!(pair, [a, b] if a < b)) {
        return Err(AppError::validation("Results must keep insertion order"));
    }
    Ok(())
}

#[test]
fn latency_summary_reports_percentiles() -> AppResult<()> {
    let mut results = Vec::new();
    for millis in 1..=100_u64 {
        results.push(RequestResult::response(
            millis,
            base_time()?,
            Duration::from_millis(millis),
            200,
            None,
        ));
    }
    let summary = LatencySummary::from_results(&results)
        .map_err(AppError::validation)?
        .ok_or_else(|| AppError::validation("Expected summary"))?;

    let tolerance = Duration::from_millis(1);
    let within = |actual: Duration, expected: Duration| {
        actual.abs_diff(expected) <= tolerance
    };
    if !within(summary.min, Duration::from_millis(1))
        || !within(summary.max, Duration::from_millis(100))
        || !within(summary.p50, Duration::from_millis(50))
        || !within(summary.p90, Duration::from_millis(90))
        || !within(summary.p99, Duration::from_millis(99))
    {
        return Err(AppError::validation(format!("Unexpected summary: {:?}", summary)));
    }
    Ok(())
}

#[test]
fn latency_summary_is_none_without_results() -> AppResult<()> {
    let summary = LatencySummary::from_results(&[]).map_err(AppError::validation)?;
    if summary.is_some() {
        return Err(AppError::validation("Expected no summary"));
    }
    Ok(())
}

#[test]
fn abort_reason_is_human_readable() -> AppResult<()> {
    let reason = AbortReason::ErrorRateExceeded {
        error_rate: 0.625,
        threshold: 0.5,
    };
    let text = reason.to_string();
    if text != "error rate 62.50% exceeded the 50% threshold" {
        return Err(AppError::validation(format!("Unexpected text: {}", text)));
    }
    Ok(())
}
