use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to bind mock server on {addr}: {source}")]
    BindMockServer {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write mock response: {source}")]
    WriteMockResponse {
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to serialize mock response: {source}")]
    SerializeMockResponse {
        #[source]
        source: serde_json::Error,
    },
}
