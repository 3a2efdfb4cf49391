use tokio::io::{AsyncWriteExt, BufWriter};

use crate::metrics::{RequestResult, RunOutcome};

const CSV_HEADER: &[u8] =
    b"index,started_at,ended_at,status_code,response_time_ms,is_error,timed_out,transport_error,error,body\n";

pub(crate) async fn export_csv(path: &str, results: &[RequestResult]) -> Result<(), std::io::Error> {
    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    writer.write_all(CSV_HEADER).await?;
    for result in results {
        writer.write_all(csv_line(result).as_bytes()).await?;
    }
    writer.flush().await?;
    Ok(())
}

pub(crate) fn csv_line(result: &RequestResult) -> String {
    format!(
        "{},{},{},{},{:.3},{},{},{},{},{}\n",
        result.index,
        result.started_at.to_rfc3339(),
        result.ended_at.to_rfc3339(),
        result.status_code,
        result.elapsed.as_secs_f64() * 1_000.0,
        u8::from(result.is_error),
        u8::from(result.timed_out),
        u8::from(result.transport_error),
        result.error.as_deref().map(csv_field).unwrap_or_default(),
        result.body.as_deref().map(csv_field).unwrap_or_default()
    )
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_owned()
    }
}

pub(crate) async fn export_json(path: &str, outcome: &RunOutcome) -> Result<(), std::io::Error> {
    let payload = serde_json::json!({
        "outcome": outcome,
        "results": outcome.results,
    });

    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    let json = serde_json::to_vec_pretty(&payload).map_err(std::io::Error::other)?;
    writer.write_all(&json).await?;
    writer.flush().await?;
    Ok(())
}
