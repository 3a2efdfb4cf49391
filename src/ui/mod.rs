//! Live terminal dashboard fed by the run's sample stream.
pub mod model;
pub mod render;

#[cfg(test)]
mod tests;
