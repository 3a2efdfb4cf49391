use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{TesterArgs, parsers::parse_duration_arg};
use crate::error::{AppError, AppResult, ConfigError};

use super::types::{ConfigFile, DurationValue, HeadersValue};

/// Applies configuration values to CLI arguments. Values given on the
/// command line (or through their environment variable) win.
///
/// # Errors
///
/// Returns an error when config values are invalid or conflict with each other.
pub fn apply_config(
    args: &mut TesterArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    ensure_single_body(config)?;

    if !is_explicit(matches, "method")
        && let Some(method) = config.method
    {
        args.method = method;
    }

    if !is_explicit(matches, "url")
        && let Some(url) = config.url.clone()
    {
        args.url = Some(url);
    }

    if !is_explicit(matches, "headers")
        && let Some(headers) = config.headers.as_ref()
    {
        args.headers = Some(headers_to_json(headers));
    }

    let cli_body = is_explicit(matches, "json")
        || is_explicit(matches, "data")
        || is_explicit(matches, "data_file");
    if !cli_body {
        if let Some(json) = config.json.as_ref() {
            args.json = Some(json.to_string());
        }
        if let Some(data) = config.data.clone() {
            args.data = Some(data);
        }
        if let Some(path) = config.data_file.clone() {
            args.data_file = Some(path);
        }
    }

    if !is_explicit(matches, "requests")
        && let Some(requests) = config.requests
    {
        args.requests = requests;
    }

    if !is_explicit(matches, "timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.timeout = to_duration(timeout)?;
    }

    if !is_explicit(matches, "no_ui")
        && let Some(no_ui) = config.no_ui
    {
        args.no_ui = no_ui;
    }

    if !is_explicit(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    if !is_explicit(matches, "no_table")
        && let Some(no_table) = config.no_table
    {
        args.no_table = no_table;
    }

    if !is_explicit(matches, "export_json")
        && let Some(path) = config.export_json.clone()
    {
        args.export_json = Some(path);
    }

    if !is_explicit(matches, "export_csv")
        && let Some(path) = config.export_csv.clone()
    {
        args.export_csv = Some(path);
    }

    Ok(())
}

fn ensure_single_body(config: &ConfigFile) -> AppResult<()> {
    let conflict = match (
        config.json.is_some(),
        config.data.is_some(),
        config.data_file.is_some(),
    ) {
        (true, true, _) => Some(("json", "data")),
        (true, _, true) => Some(("json", "data_file")),
        (_, true, true) => Some(("data", "data_file")),
        _ => None,
    };
    match conflict {
        Some((left, right)) => Err(AppError::config(ConfigError::Conflict { left, right })),
        None => Ok(()),
    }
}

fn headers_to_json(headers: &HeadersValue) -> String {
    match headers {
        HeadersValue::Json(text) => text.clone(),
        HeadersValue::Table(table) => {
            let object: serde_json::Map<String, serde_json::Value> = table
                .iter()
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            serde_json::Value::Object(object).to_string()
        }
    }
}

fn to_duration(value: &DurationValue) -> AppResult<std::time::Duration> {
    let parsed = match value {
        DurationValue::Seconds(secs) => parse_duration_arg(&secs.to_string()),
        DurationValue::Text(text) => parse_duration_arg(text),
    };
    parsed.map_err(|err| {
        AppError::config(ConfigError::InvalidField {
            field: "timeout",
            source: err,
        })
    })
}

fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}
