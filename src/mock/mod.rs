//! Disposable HTTP endpoint with randomized latency and failures, for trying
//! the tester without a real service.
mod http;
mod server;


pub use server::{MockConfig, MockServer};
