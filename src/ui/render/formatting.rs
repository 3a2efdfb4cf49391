use std::time::Duration;

pub(super) fn format_ms(value: Duration) -> String {
    format!("{:.1} ms", value.as_secs_f64() * 1_000.0)
}

pub(super) fn format_rate(value: Option<f64>) -> String {
    value.map_or_else(|| "--".to_owned(), |rps| format!("{:.2}", rps))
}

pub(super) fn format_percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}
