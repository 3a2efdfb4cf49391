use std::time::Duration;

use crate::metrics::{LatencySummary, RequestResult, RunOutcome, Termination};

pub(crate) fn summary_lines(target: &str, outcome: &RunOutcome) -> Vec<String> {
    let stats = &outcome.statistics;
    let mut lines = Vec::with_capacity(10);

    lines.push(format!("Target: {}", target));
    lines.push(match outcome.termination {
        Termination::Completed => "Outcome: completed".to_owned(),
        Termination::Aborted(reason) => format!("Outcome: aborted ({})", reason),
    });
    lines.push(format!(
        "Requests: {} / {} (successful {}, errors {})",
        stats.total_requests,
        outcome.requested,
        stats.successful_requests,
        stats.error_requests()
    ));
    lines.push(format!("Span: {:.3}s", stats.span.as_secs_f64()));
    lines.push(format!(
        "Requests/s: {}",
        stats
            .requests_per_second
            .map_or_else(|| "--".to_owned(), |rps| format!("{:.2}", rps))
    ));
    lines.push(format!(
        "Avg Response Time: {}",
        format_ms(stats.avg_response_time)
    ));

    match LatencySummary::from_results(&outcome.results) {
        Ok(Some(latency)) => {
            lines.push(format!(
                "Min/Max Response Time: {} / {}",
                format_ms(latency.min),
                format_ms(latency.max)
            ));
            lines.push(format!(
                "P50/P90/P99: {} / {} / {}",
                format_ms(latency.p50),
                format_ms(latency.p90),
                format_ms(latency.p99)
            ));
        }
        Ok(None) => {}
        Err(err) => tracing::warn!("Skipping percentiles: {}", err),
    }

    lines.push(format!("Error Rate: {:.2}%", stats.error_rate * 100.0));
    lines
}

/// Characters of each response body shown in the detailed table.
const BODY_PREVIEW_CHARS: usize = 40;
const TABLE_WIDTH: usize = 132;

pub(crate) fn table_lines(results: &[RequestResult]) -> Vec<String> {
    let mut lines = Vec::with_capacity(results.len().saturating_add(2));
    lines.push(format!(
        "{:>5}  {:<26}  {:<26}  {:>6}  {:>10}  {:<5}  {}",
        "#", "Start (UTC)", "End (UTC)", "Status", "Time (ms)", "Error", "Body"
    ));
    lines.push("-".repeat(TABLE_WIDTH));
    for result in results {
        let status = if result.timed_out {
            "T/O".to_owned()
        } else {
            result.status_code.to_string()
        };
        lines.push(format!(
            "{:>5}  {:<26}  {:<26}  {:>6}  {:>10.1}  {:<5}  {}",
            result.index,
            result.started_at.format("%Y-%m-%d %H:%M:%S%.3f"),
            result.ended_at.format("%Y-%m-%d %H:%M:%S%.3f"),
            status,
            result.elapsed.as_secs_f64() * 1_000.0,
            if result.is_error { "yes" } else { "no" },
            body_preview(result.body.as_deref())
        ));
    }
    lines
}

pub(crate) fn print_report(target: &str, outcome: &RunOutcome, show_table: bool) {
    println!();
    for line in summary_lines(target, outcome) {
        println!("{}", line);
    }
    if show_table && !outcome.results.is_empty() {
        println!();
        for line in table_lines(&outcome.results) {
            println!("{}", line);
        }
    }
}

pub(crate) fn body_preview(body: Option<&str>) -> String {
    let flat: String = body
        .unwrap_or_default()
        .chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect();
    let flat = flat.trim();
    if flat.is_empty() {
        return "-".to_owned();
    }
    if flat.chars().count() <= BODY_PREVIEW_CHARS {
        return flat.to_owned();
    }
    let head: String = flat
        .chars()
        .take(BODY_PREVIEW_CHARS.saturating_sub(3))
        .collect();
    format!("{}...", head)
}

fn format_ms(value: Duration) -> String {
    format!("{:.1}ms", value.as_secs_f64() * 1_000.0)
}
