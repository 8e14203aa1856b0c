//! Data models for the perftest sweep harness

pub mod config;
pub mod result;
pub mod test_spec;

// Re-export main model types
pub use config::RunConfig;
pub use result::{RunResult, RunOutcome};
pub use test_spec::TestSpec;
