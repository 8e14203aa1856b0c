//! perftest-sweep
//!
//! Drives RDMA perftest binaries (`ib_read_bw`, `ib_read_lat`, `ib_write_bw`,
//! `ib_write_lat`) across a power-of-two sweep of message sizes, retrying
//! while the peer is not yet accepting connections, and prints the numbers
//! each invocation reports.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod runner;
pub mod sweep;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{RunConfig, TestSpec, RunResult, RunOutcome};
pub use runner::{CommandRunner, CommandInvocation, CommandExecutor, ProcessExecutor, OutputParser, PenultimateLineParser};
pub use sweep::{SweepDriver, SweepOutcome, SweepSummary};
pub use output::{SweepReporter, PlainReporter, JsonReporter, ReporterFactory};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");
pub const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");

/// Default configuration values (the reference benchmark run)
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_INTERFACE: &str = "siw_enp94s0f0";
    pub const DEFAULT_ITERATIONS: u32 = 10_000;
    pub const DEFAULT_SERVER_ADDRESS: &str = "10.10.1.2";
    pub const DEFAULT_MAX_MESSAGE_SIZE_LOG2: u32 = 16;
    pub const DEFAULT_PERFTEST_DIR: &str = "/users/sg99/perftest";
    /// Display name and binary file name, in sweep order
    pub const DEFAULT_TESTS: &[(&str, &str)] = &[
        ("Read Throughput", "ib_read_bw"),
        ("Read Latency", "ib_read_lat"),
        ("Write Throughput", "ib_write_bw"),
        ("Write Latency", "ib_write_lat"),
    ];
    pub const DEFAULT_MAX_RETRIES: u32 = 5;
    pub const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(200);
    pub const BACKOFF_MULTIPLIER: f64 = 2.0;
    /// Substring perftest prints on stderr while the server side is not listening yet
    pub const CONNECTION_REFUSED_MARKER: &str = "Couldn't connect";
    pub const DEFAULT_ENABLE_COLOR: bool = true;

    /// Upper bounds enforced by config validation
    pub const MAX_MESSAGE_SIZE_LOG2: u32 = 32;
    pub const MAX_ITERATIONS: u32 = 1_000_000_000;
    pub const MAX_RETRIES: u32 = 16;
}
