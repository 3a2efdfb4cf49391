pub(crate) const DEFAULT_USER_AGENT: &str = concat!("apiprobe/", env!("CARGO_PKG_VERSION"));

pub(super) const DEFAULT_REQUESTS: &str = "10";
pub(super) const DEFAULT_TIMEOUT: &str = "30s";
pub(super) const DEFAULT_MOCK_LISTEN: &str = "127.0.0.1:8000";

pub(crate) const DEFAULT_MOCK_ERROR_RATE: f64 = 0.05;
pub(crate) const DEFAULT_MOCK_DELAY_LOCATION: f64 = -2.0;
pub(crate) const DEFAULT_MOCK_DELAY_SCALE: f64 = 0.3;
