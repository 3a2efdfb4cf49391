use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing URL (set --url or provide in config).")]
    MissingUrl,
    #[error("URL must not be empty.")]
    UrlEmpty,
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Unsupported URL scheme '{scheme}'. Use http or https.")]
    UnsupportedScheme { scheme: String },
    #[error("URL is missing host.")]
    UrlMissingHost,
    #[error("Could not parse headers as JSON: {source}")]
    InvalidHeadersJson {
        #[source]
        source: serde_json::Error,
    },
    #[error("Headers must be a JSON object of name/value pairs.")]
    HeadersNotObject,
    #[error("Header '{name}' must have a string, number, or boolean value.")]
    InvalidHeaderValueType { name: String },
    #[error("Invalid header name '{name}'.")]
    InvalidHeaderName { name: String },
    #[error("Invalid value for header '{name}'.")]
    InvalidHeaderValue { name: String },
    #[error("Could not parse body as JSON: {source}")]
    InvalidBodyJson {
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to read body file '{path}': {source}")]
    ReadBodyFile {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Request count must be between {min} and {max}, got {value}.")]
    RequestCountOutOfRange { value: u64, min: u64, max: u64 },
    #[error("Invalid request count: {source}")]
    InvalidRequestCount {
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration must not be empty.")]
    DurationEmpty,
    #[error("Invalid duration '{value}'.")]
    InvalidDurationFormat { value: String },
    #[error("Invalid duration '{value}': {source}")]
    InvalidDurationNumber {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("Duration overflow.")]
    DurationOverflow,
    #[error("Invalid duration unit '{unit}'.")]
    InvalidDurationUnit { unit: String },
    #[error("Duration must be > 0.")]
    DurationZero,
    #[error("Error rate must be within 0.0..=1.0, got {value}.")]
    ErrorRateOutOfRange { value: f64 },
    #[error("Invalid delay distribution (location {location}, scale {scale}).")]
    InvalidDelayDistribution { location: f64, scale: f64 },
    #[error("Failed to build runtime: {source}")]
    RuntimeBuildFailed {
        #[source]
        source: std::io::Error,
    },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
    #[cfg(test)]
    #[error("Test expectation failed: {message}: {value}")]
    TestExpectationValue {
        message: &'static str,
        value: String,
    },
}
