//! Core library for the `apiprobe` CLI.
//!
//! `apiprobe` sends a sequence of HTTP requests to one endpoint, one at a
//! time, and folds every result into running statistics. A circuit breaker
//! stops the run early when the endpoint keeps failing. The engine lives in
//! [`run`], the single-request executor in [`http`], and the statistics in
//! [`metrics`]; the dashboard, config file support and a mock endpoint sit
//! around them.
mod app;
pub mod args;
pub mod config;
pub mod entry;
pub mod error;
pub mod http;
mod logger;
pub mod metrics;
pub mod mock;
pub mod run;
pub mod shutdown;
pub mod shutdown_handlers;
pub mod ui;
