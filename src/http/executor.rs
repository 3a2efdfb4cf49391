use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use futures_util::StreamExt;
use reqwest::Client;
use tracing::debug;

use crate::args::DEFAULT_USER_AGENT;
use crate::error::{AppError, AppResult, HttpError};
use crate::metrics::RequestResult;

use super::spec::RequestSpec;

/// Largest response body kept on a result; the remainder is drained.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Sends one request and reports what happened. Implementations never fail:
/// every problem is folded into the returned result.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, spec: &RequestSpec, index: u64) -> RequestResult;
}

/// Executor backed by a reqwest client configured from the spec.
#[derive(Debug, Clone)]
pub struct HttpExecutor {
    client: Client,
}

impl HttpExecutor {
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub fn new(spec: &RequestSpec) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(spec.timeout())
            .user_agent(DEFAULT_USER_AGENT)
            .build()
            .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RequestExecutor for HttpExecutor {
    async fn execute(&self, spec: &RequestSpec, index: u64) -> RequestResult {
        let started_at = Utc::now();
        let clock = Instant::now();

        let request = match spec.build_request(&self.client) {
            Ok(request) => request,
            Err(err) => {
                return RequestResult::transport_failure(
                    index,
                    started_at,
                    clock.elapsed(),
                    false,
                    err.to_string(),
                );
            }
        };

        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(err) => {
                let elapsed = clock.elapsed();
                debug!("Request {} failed after {:?}: {}", index, elapsed, err);
                return RequestResult::transport_failure(
                    index,
                    started_at,
                    elapsed,
                    err.is_timeout(),
                    err.to_string(),
                );
            }
        };

        let status = response.status().as_u16();
        let body = read_body(response).await;
        let elapsed = clock.elapsed();

        match body {
            Ok(body) => {
                debug!("Request {} -> {} in {:?}", index, status, elapsed);
                RequestResult::response(index, started_at, elapsed, status, Some(body))
            }
            Err(err) => {
                debug!(
                    "Request {} failed reading body after {:?}: {}",
                    index, elapsed, err
                );
                RequestResult::transport_failure(
                    index,
                    started_at,
                    elapsed,
                    err.is_timeout(),
                    err.to_string(),
                )
            }
        }
    }
}

async fn read_body(response: reqwest::Response) -> Result<String, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut kept: Vec<u8> = Vec::new();
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        let room = MAX_BODY_BYTES.saturating_sub(kept.len());
        if room > 0 {
            let take = room.min(bytes.len());
            if let Some(head) = bytes.get(..take) {
                kept.extend_from_slice(head);
            }
        }
    }
    Ok(String::from_utf8_lossy(&kept).into_owned())
}
