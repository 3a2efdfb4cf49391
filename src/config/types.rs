use std::collections::BTreeMap;

use serde::Deserialize;

use crate::args::{HttpMethod, RequestCount};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub method: Option<HttpMethod>,
    pub url: Option<String>,
    pub headers: Option<HeadersValue>,
    pub json: Option<serde_json::Value>,
    pub data: Option<String>,
    pub data_file: Option<String>,
    pub requests: Option<RequestCount>,
    pub timeout: Option<DurationValue>,
    pub no_ui: Option<bool>,
    pub no_color: Option<bool>,
    pub no_table: Option<bool>,
    pub export_json: Option<String>,
    pub export_csv: Option<String>,
}

/// Headers either as a JSON object string or as a native table.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HeadersValue {
    Json(String),
    Table(BTreeMap<String, serde_json::Value>),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}
