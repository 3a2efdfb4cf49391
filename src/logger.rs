use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Environment variable checked before `RUST_LOG`.
pub const LOG_ENV: &str = "APIPROBE_LOG";

/// Installs the global subscriber. Logs go to stderr so the final report on
/// stdout stays clean.
pub fn init_logging(verbose: bool, no_color: bool, dashboard: bool) {
    let fallback = default_directive(verbose, dashboard);
    let filter = std::env::var(LOG_ENV)
        .or_else(|_| std::env::var("RUST_LOG"))
        .map_or_else(
            |_| EnvFilter::new(fallback),
            |value| EnvFilter::try_new(value).unwrap_or_else(|_| EnvFilter::new(fallback)),
        );

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

const fn default_directive(verbose: bool, dashboard: bool) -> &'static str {
    match (verbose, dashboard) {
        (true, _) => "debug",
        (false, true) => "warn",
        (false, false) => "info",
    }
}
