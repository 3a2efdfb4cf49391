use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }

    #[must_use]
    pub const fn accepts_body(self) -> bool {
        matches!(self, HttpMethod::Post)
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// Number of requests in a run, bounded to `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u64")]
pub struct RequestCount(u64);

impl RequestCount {
    pub const MIN: u64 = 1;
    pub const MAX: u64 = 1000;

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<u64> for RequestCount {
    type Error = ValidationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(RequestCount(value))
        } else {
            Err(ValidationError::RequestCountOutOfRange {
                value,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }
}

impl std::str::FromStr for RequestCount {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u64 = s
            .trim()
            .parse()
            .map_err(|err| ValidationError::InvalidRequestCount { source: err })?;
        RequestCount::try_from(value)
    }
}

impl From<RequestCount> for u64 {
    fn from(value: RequestCount) -> Self {
        value.get()
    }
}

impl<'de> Deserialize<'de> for RequestCount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = u64::deserialize(deserializer)?;
        RequestCount::try_from(value).map_err(serde::de::Error::custom)
    }
}
