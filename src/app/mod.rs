mod export;
mod mock;
mod runner;
pub(crate) mod summary;

#[cfg(test)]
mod tests;

pub(crate) use mock::run_mock;
pub(crate) use runner::{dashboard_enabled, run_local};
