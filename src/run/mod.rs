//! Sequential run engine: the controller loop and its abort policy.
mod controller;
mod policy;


pub use controller::{RunController, RunSample, RunState};
pub use policy::{AbortPolicy, ERROR_RATE_THRESHOLD, WARMUP_REQUESTS};
