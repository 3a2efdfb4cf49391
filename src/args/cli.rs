use clap::{Args, Parser, Subcommand};
use std::time::Duration;

use super::defaults::{
    DEFAULT_MOCK_DELAY_LOCATION, DEFAULT_MOCK_DELAY_SCALE, DEFAULT_MOCK_ERROR_RATE,
    DEFAULT_MOCK_LISTEN, DEFAULT_REQUESTS, DEFAULT_TIMEOUT,
};
use super::parsers::{parse_duration_arg, parse_error_rate, parse_request_count};
use super::types::{HttpMethod, RequestCount};

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Serve a disposable mock endpoint with randomized latency and errors
    Mock(MockArgs),
}

#[derive(Debug, Args, Clone)]
pub struct MockArgs {
    /// Address to listen on
    #[arg(long, default_value = DEFAULT_MOCK_LISTEN)]
    pub listen: String,

    /// Fraction of requests answered with HTTP 500 (0.0-1.0)
    #[arg(long = "error-rate", default_value_t = DEFAULT_MOCK_ERROR_RATE, value_parser = parse_error_rate)]
    pub error_rate: f64,

    /// Location (mu) of the log-normal response delay, in ln(seconds)
    #[arg(long = "delay-location", default_value_t = DEFAULT_MOCK_DELAY_LOCATION, allow_negative_numbers = true)]
    pub delay_location: f64,

    /// Scale (sigma) of the log-normal response delay
    #[arg(long = "delay-scale", default_value_t = DEFAULT_MOCK_DELAY_SCALE)]
    pub delay_scale: f64,

    /// Respond immediately instead of sleeping
    #[arg(long = "no-delay")]
    pub no_delay: bool,

    /// Seed the random generator for reproducible responses
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Quick HTTP smoke/load tester - sequential requests, live terminal stats, and an error-rate circuit breaker."
)]
pub struct TesterArgs {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// HTTP method to use
    #[arg(long, short = 'X', default_value = "get", ignore_case = true)]
    pub method: HttpMethod,

    /// Target URL
    #[arg(long, short)]
    pub url: Option<String>,

    /// Request headers as a JSON object, e.g. '{"Authorization": "Bearer abc"}'
    #[arg(long, short = 'H')]
    pub headers: Option<String>,

    /// JSON request body (POST); must be valid JSON
    #[arg(long, conflicts_with_all = ["data", "data_file"])]
    pub json: Option<String>,

    /// Literal request body text (POST)
    #[arg(long, short, conflicts_with_all = ["json", "data_file"])]
    pub data: Option<String>,

    /// Request body read from a file (POST)
    #[arg(long = "data-file", short = 'D', conflicts_with_all = ["json", "data"])]
    pub data_file: Option<String>,

    /// Number of requests to send (1-1000)
    #[arg(long, short = 'n', default_value = DEFAULT_REQUESTS, value_parser = parse_request_count)]
    pub requests: RequestCount,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(long, default_value = DEFAULT_TIMEOUT, value_parser = parse_duration_arg)]
    pub timeout: Duration,

    /// Disable the live dashboard and log each request instead
    #[arg(long = "no-ui")]
    pub no_ui: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Skip the detailed per-request table in the final report
    #[arg(long = "no-table")]
    pub no_table: bool,

    /// Write the run outcome and every result as JSON
    #[arg(long = "export-json")]
    pub export_json: Option<String>,

    /// Write every result as CSV
    #[arg(long = "export-csv")]
    pub export_csv: Option<String>,

    /// Enable verbose logging (sets log level to debug unless overridden by APIPROBE_LOG/RUST_LOG)
    #[arg(long, short)]
    pub verbose: bool,

    /// Path to config file (TOML/JSON). Defaults to ./apiprobe.toml or ./apiprobe.json if present.
    #[arg(long, short, env = "APIPROBE_CONFIG")]
    pub config: Option<String>,
}
