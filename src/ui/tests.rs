use std::time::Duration;

use chrono::DateTime;
use ratatui::Terminal;
use ratatui::backend::TestBackend;

use super::model::UiData;
use super::render::{Ui, UiActions};
use crate::error::{AppError, AppResult};
use crate::metrics::{AbortReason, RequestResult, ResultAggregator, Termination};
use crate::run::RunSample;

fn samples(latencies_ms: &[u64], failing: &[u64]) -> Vec<RunSample> {
    let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default();
    let mut aggregator = ResultAggregator::new();
    latencies_ms
        .iter()
        .zip(0_u64..)
        .map(|(ms, index)| {
            let status = if failing.contains(&index) { 500 } else { 200 };
            let result =
                RequestResult::response(index, start, Duration::from_millis(*ms), status, None);
            let statistics = aggregator.append(result.clone());
            RunSample { result, statistics }
        })
        .collect()
}

fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol.as_str())
        .collect()
}

#[test]
fn ui_render_does_not_panic() -> AppResult<()> {
    let mut terminal = Terminal::new(TestBackend::new(100, 30))
        .map_err(|err| AppError::validation(format!("Failed to create terminal: {}", err)))?;

    let mut data = UiData::new("GET http://localhost:8000/".to_owned(), 10, false);
    for sample in samples(&[100, 120, 90, 300, 110], &[3]) {
        data.apply(&sample);
    }
    Ui::render(&mut terminal, &data);

    let text = buffer_text(&terminal);
    for needle in ["Total Requests", "Requests/s", "Error Rate", "5 / 10 requests"] {
        if !text.contains(needle) {
            return Err(AppError::validation(format!("Missing '{}' in frame", needle)));
        }
    }
    Ok(())
}

#[test]
fn ui_renders_abort_reason() -> AppResult<()> {
    let mut terminal = Terminal::new(TestBackend::new(120, 30))
        .map_err(|err| AppError::validation(format!("Failed to create terminal: {}", err)))?;

    let mut data = UiData::new("POST http://localhost:8000/".to_owned(), 10, true);
    for sample in samples(&[10; 6], &[0, 1, 2, 3, 4, 5]) {
        data.apply(&sample);
    }
    data.finish(Termination::Aborted(AbortReason::ErrorRateExceeded {
        error_rate: 1.0,
        threshold: 0.5,
    }));
    Ui::render(&mut terminal, &data);

    if !buffer_text(&terminal).contains("Aborted after 6 requests") {
        return Err(AppError::validation("Expected abort reason in header"));
    }
    Ok(())
}

#[test]
fn ui_renders_empty_snapshot_on_small_terminal() -> AppResult<()> {
    let mut terminal = Terminal::new(TestBackend::new(20, 5))
        .map_err(|err| AppError::validation(format!("Failed to create terminal: {}", err)))?;
    let data = UiData::new("GET http://x/".to_owned(), 1, false);
    Ui::render(&mut terminal, &data);
    Ok(())
}

#[test]
fn latency_buckets_cover_every_result() -> AppResult<()> {
    let mut data = UiData::new(String::new(), 6, false);
    for sample in samples(&[10, 20, 30, 40, 50, 100], &[]) {
        data.apply(&sample);
    }
    let buckets = data.latency_buckets(4);
    let total: u64 = buckets.iter().map(|bucket| bucket.count).sum();
    if buckets.len() != 4 || total != 6 {
        return Err(AppError::validation(format!("Unexpected buckets: {:?}", buckets)));
    }
    if buckets.last().map(|bucket| bucket.count) != Some(1) {
        return Err(AppError::validation("Slowest result belongs in the last bucket"));
    }
    Ok(())
}

#[test]
fn progress_tracks_completed_fraction() -> AppResult<()> {
    let mut data = UiData::new(String::new(), 4, false);
    for sample in samples(&[5, 5], &[]) {
        data.apply(&sample);
    }
    if (data.progress() - 0.5).abs() > f64::EPSILON {
        return Err(AppError::validation(format!(
            "Expected progress 0.5, got {}",
            data.progress()
        )));
    }
    if data.last_status != Some(200) || data.latencies.len() != 2 {
        return Err(AppError::validation("Snapshot did not record samples"));
    }
    Ok(())
}
