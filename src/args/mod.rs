//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod test_support;

pub use cli::{Command, MockArgs, TesterArgs};
pub use types::{HttpMethod, RequestCount};

pub(crate) use defaults::{
    DEFAULT_MOCK_DELAY_LOCATION, DEFAULT_MOCK_DELAY_SCALE, DEFAULT_MOCK_ERROR_RATE,
    DEFAULT_USER_AGENT,
};
#[cfg(test)]
pub(crate) use test_support::parse_test_args;
