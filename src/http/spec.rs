use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Request};
use tracing::warn;
use url::Url;

use crate::args::{HttpMethod, RequestCount, TesterArgs};
use crate::error::{AppError, AppResult, ValidationError};

const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(serde_json::Value),
    Text(String),
    Bytes(Vec<u8>),
}

impl RequestBody {
    fn to_bytes(&self) -> Vec<u8> {
        match self {
            RequestBody::Json(value) => value.to_string().into_bytes(),
            RequestBody::Text(text) => text.clone().into_bytes(),
            RequestBody::Bytes(bytes) => bytes.clone(),
        }
    }
}

/// Everything needed to issue the requests of one run. Built once, never
/// mutated while the run is in progress.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    url: Url,
    method: HttpMethod,
    headers: BTreeMap<String, String>,
    body: Option<RequestBody>,
    timeout: Duration,
    count: RequestCount,
}

impl RequestSpec {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    #[must_use]
    pub fn new(url: Url, count: RequestCount) -> Self {
        Self {
            url,
            method: HttpMethod::Get,
            headers: BTreeMap::new(),
            body: None,
            timeout: Self::DEFAULT_TIMEOUT,
            count,
        }
    }

    /// Validates CLI/config input and builds the request description.
    ///
    /// # Errors
    ///
    /// Returns an error when the URL is missing or invalid, the headers are
    /// not a flat JSON object, the JSON body does not parse, or the body file
    /// cannot be read.
    pub fn from_args(args: &TesterArgs) -> AppResult<Self> {
        let raw_url = args
            .url
            .as_deref()
            .ok_or_else(|| AppError::validation(ValidationError::MissingUrl))?;
        let url = parse_target_url(raw_url)?;

        let mut spec = Self::new(url, args.requests)
            .with_method(args.method)
            .with_timeout(args.timeout);

        if let Some(raw_headers) = args.headers.as_deref() {
            for (name, value) in parse_headers(raw_headers)? {
                spec = spec.with_header(&name, &value)?;
            }
        }

        if let Some(body) = resolve_body(args)? {
            spec = spec.with_body(body);
        }

        Ok(spec)
    }

    #[must_use]
    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Adds a header, replacing any existing header with the same name
    /// regardless of case.
    ///
    /// # Errors
    ///
    /// Returns an error when the name or value is not a valid HTTP header.
    pub fn with_header(mut self, name: &str, value: &str) -> AppResult<Self> {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            return Err(AppError::validation(ValidationError::InvalidHeaderName {
                name: name.to_owned(),
            }));
        }
        if HeaderValue::from_str(value).is_err() {
            return Err(AppError::validation(ValidationError::InvalidHeaderValue {
                name: name.to_owned(),
            }));
        }
        self.headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(name));
        self.headers.insert(name.to_owned(), value.to_owned());
        Ok(self)
    }

    /// Attaches a body. Bodies are dropped for methods that do not send one.
    #[must_use]
    pub fn with_body(mut self, body: RequestBody) -> Self {
        if self.method.accepts_body() {
            self.body = Some(body);
        } else {
            warn!(
                "Ignoring request body for {} requests.",
                self.method.as_str()
            );
        }
        self
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub const fn method(&self) -> HttpMethod {
        self.method
    }

    #[must_use]
    pub const fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    #[must_use]
    pub const fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub const fn count(&self) -> RequestCount {
        self.count
    }

    /// Header map sent with every request: JSON content type first, then the
    /// caller's headers on top.
    #[must_use]
    pub fn header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        if matches!(self.body, Some(RequestBody::Json(_))) {
            map.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }
        for (name, value) in &self.headers {
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                map.insert(name, value);
            }
        }
        map
    }

    /// Builds one request against `client`.
    ///
    /// # Errors
    ///
    /// Returns an error when reqwest rejects the assembled request.
    pub fn build_request(&self, client: &Client) -> Result<Request, reqwest::Error> {
        let mut builder = client
            .request(self.method.into(), self.url.clone())
            .headers(self.header_map());
        if let Some(body) = self.body.as_ref() {
            builder = builder.body(body.to_bytes());
        }
        builder.build()
    }
}

fn parse_target_url(raw: &str) -> AppResult<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(ValidationError::UrlEmpty));
    }
    let url = Url::parse(trimmed).map_err(|err| {
        AppError::validation(ValidationError::InvalidUrl {
            url: trimmed.to_owned(),
            source: err,
        })
    })?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(AppError::validation(ValidationError::UnsupportedScheme {
                scheme: other.to_owned(),
            }));
        }
    }
    if url.host_str().is_none_or(str::is_empty) {
        return Err(AppError::validation(ValidationError::UrlMissingHost));
    }
    Ok(url)
}

fn parse_headers(raw: &str) -> AppResult<Vec<(String, String)>> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|err| AppError::validation(ValidationError::InvalidHeadersJson { source: err }))?;
    let serde_json::Value::Object(object) = value else {
        return Err(AppError::validation(ValidationError::HeadersNotObject));
    };

    let mut headers = Vec::with_capacity(object.len());
    for (name, value) in object {
        let text = match value {
            serde_json::Value::String(text) => text,
            serde_json::Value::Number(number) => number.to_string(),
            serde_json::Value::Bool(flag) => flag.to_string(),
            serde_json::Value::Null
            | serde_json::Value::Array(_)
            | serde_json::Value::Object(_) => {
                return Err(AppError::validation(
                    ValidationError::InvalidHeaderValueType { name },
                ));
            }
        };
        headers.push((name, text));
    }
    Ok(headers)
}

fn resolve_body(args: &TesterArgs) -> AppResult<Option<RequestBody>> {
    if let Some(raw) = args.json.as_deref() {
        let value = serde_json::from_str(raw)
            .map_err(|err| AppError::validation(ValidationError::InvalidBodyJson { source: err }))?;
        return Ok(Some(RequestBody::Json(value)));
    }
    if let Some(text) = args.data.as_ref() {
        return Ok(Some(RequestBody::Text(text.clone())));
    }
    if let Some(path) = args.data_file.as_ref() {
        let bytes = std::fs::read(path).map_err(|err| {
            AppError::validation(ValidationError::ReadBodyFile {
                path: path.clone(),
                source: err,
            })
        })?;
        return Ok(Some(RequestBody::Bytes(bytes)));
    }
    Ok(None)
}
