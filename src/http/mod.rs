//! Request description and single-request execution.
mod executor;
mod spec;


pub use executor::{HttpExecutor, MAX_BODY_BYTES, RequestExecutor};
pub use spec::{RequestBody, RequestSpec};
