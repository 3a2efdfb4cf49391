use std::time::Duration;

use chrono::DateTime;
use tempfile::tempdir;

use super::export::{csv_line, export_csv, export_json};
use super::summary::{body_preview, summary_lines, table_lines};
use crate::error::{AppError, AppResult};
use crate::metrics::{AbortReason, RequestResult, RunOutcome, Termination, recompute};

fn outcome(termination: Termination) -> RunOutcome {
    let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap_or_default();
    let results = vec![
        RequestResult::response(
            0,
            start,
            Duration::from_millis(120),
            200,
            Some("{\"status\":\"ok\"}".to_owned()),
        ),
        RequestResult::transport_failure(
            1,
            start,
            Duration::from_millis(30),
            false,
            "connection refused, \"retry\"".to_owned(),
        ),
    ];
    RunOutcome {
        requested: 10,
        termination,
        statistics: recompute(&results),
        results,
    }
}

#[test]
fn summary_reports_completion_and_rates() -> AppResult<()> {
    let lines = summary_lines("GET http://localhost/", &outcome(Termination::Completed));
    let text = lines.join("\n");
    for needle in [
        "Target: GET http://localhost/",
        "Outcome: completed",
        "Requests: 2 / 10 (successful 1, errors 1)",
        "Error Rate: 50.00%",
        "P50/P90/P99",
    ] {
        if !text.contains(needle) {
            return Err(AppError::validation(format!(
                "Missing '{}' in summary:\n{}",
                needle, text
            )));
        }
    }
    Ok(())
}

#[test]
fn summary_reports_abort_reason() -> AppResult<()> {
    let aborted = outcome(Termination::Aborted(AbortReason::Cancelled));
    let lines = summary_lines("GET http://localhost/", &aborted);
    if !lines.iter().any(|line| line == "Outcome: aborted (cancelled by user)") {
        return Err(AppError::validation(format!("Unexpected summary: {:?}", lines)));
    }
    Ok(())
}

#[test]
fn table_has_a_row_per_result() -> AppResult<()> {
    let lines = table_lines(&outcome(Termination::Completed).results);
    if lines.len() != 4 {
        return Err(AppError::validation(format!(
            "Expected header, rule and 2 rows, got {}",
            lines.len()
        )));
    }
    let failure_row = lines
        .get(3)
        .ok_or_else(|| AppError::validation("Missing failure row"))?;
    if !failure_row.contains("yes") || !failure_row.contains(" 0 ") {
        return Err(AppError::validation(format!("Unexpected row: {}", failure_row)));
    }
    Ok(())
}

#[test]
fn table_and_csv_carry_response_bodies() -> AppResult<()> {
    let run = outcome(Termination::Completed);
    let lines = table_lines(&run.results);
    let success_row = lines
        .get(2)
        .ok_or_else(|| AppError::validation("Missing success row"))?;
    if !success_row.ends_with("{\"status\":\"ok\"}") {
        return Err(AppError::validation(format!("Unexpected row: {}", success_row)));
    }
    let failure_row = lines
        .get(3)
        .ok_or_else(|| AppError::validation("Missing failure row"))?;
    if !failure_row.ends_with("  -") {
        return Err(AppError::validation(format!("Unexpected row: {}", failure_row)));
    }

    let success = run
        .results
        .first()
        .ok_or_else(|| AppError::validation("Missing success"))?;
    let line = csv_line(success);
    if !line.ends_with(",0,0,0,,\"{\"\"status\"\":\"\"ok\"\"}\"\n") {
        return Err(AppError::validation(format!("Unexpected CSV line: {}", line)));
    }
    Ok(())
}

#[test]
fn body_preview_flattens_and_truncates() -> AppResult<()> {
    let long = format!("line one\nline two {}", "x".repeat(80));
    let preview = body_preview(Some(&long));
    if preview.chars().count() != 40 || !preview.ends_with("...") || preview.contains('\n') {
        return Err(AppError::validation(format!("Unexpected preview: {}", preview)));
    }
    if body_preview(Some("  \n ")) != "-" || body_preview(None) != "-" {
        return Err(AppError::validation("Empty bodies should show a dash"));
    }
    Ok(())
}

#[test]
fn csv_quotes_error_text() -> AppResult<()> {
    let run = outcome(Termination::Completed);
    let failure = run
        .results
        .get(1)
        .ok_or_else(|| AppError::validation("Missing failure"))?;
    let line = csv_line(failure);
    if !line.ends_with(",1,0,1,\"connection refused, \"\"retry\"\"\",\n") {
        return Err(AppError::validation(format!("Unexpected CSV line: {}", line)));
    }
    Ok(())
}

#[tokio::test(flavor = "current_thread")]
async fn exports_write_outcome_and_results() -> AppResult<()> {
    let dir = tempdir()?;
    let json_path = dir.path().join("run.json");
    let csv_path = dir.path().join("run.csv");
    let run = outcome(Termination::Aborted(AbortReason::ErrorRateExceeded {
        error_rate: 0.6,
        threshold: 0.5,
    }));

    export_json(&json_path.to_string_lossy(), &run).await?;
    export_csv(&csv_path.to_string_lossy(), &run.results).await?;

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&json_path)?)?;
    if json.pointer("/outcome/termination/state").and_then(|value| value.as_str())
        != Some("aborted")
    {
        return Err(AppError::validation(format!("Unexpected outcome: {}", json)));
    }
    if json
        .pointer("/results")
        .and_then(|value| value.as_array())
        .map(Vec::len)
        != Some(2)
    {
        return Err(AppError::validation("Expected 2 exported results"));
    }

    let csv = std::fs::read_to_string(&csv_path)?;
    if csv.lines().count() != 3 || !csv.starts_with("index,started_at") {
        return Err(AppError::validation(format!("Unexpected CSV: {}", csv)));
    }
    Ok(())
}
