//! Command-line interface

use crate::types::{OutputFormat, Role};
use clap::{ArgAction, Parser};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Sweep RDMA perftest binaries across power-of-two message sizes
///
/// Unset options fall back to PERFTEST_* environment variables (also read
/// from a .env file), then to the built-in reference run.
#[derive(Parser, Debug, Clone)]
#[command(name = "perftest-sweep")]
#[command(version, about, long_about = None)]
#[command(after_long_help = crate::config::env::EnvManager::display_env_help())]
pub struct Cli {
    /// RDMA device handed to perftest with -d
    #[arg(short = 'd', long)]
    pub interface: Option<String>,

    /// Iterations per invocation, handed to perftest with -n
    #[arg(short = 'n', long)]
    pub iterations: Option<u32>,

    /// Side of the transfer this harness drives
    #[arg(long, value_enum)]
    pub role: Option<Role>,

    /// Server to connect to in client role
    #[arg(long)]
    pub server_address: Option<String>,

    /// Sweep message sizes 2^0 through 2^N
    #[arg(long = "max-size-log2", value_name = "N")]
    pub max_size_log2: Option<u32>,

    /// Directory containing ib_read_bw, ib_read_lat, ib_write_bw and ib_write_lat
    #[arg(long, value_name = "DIR")]
    pub perftest_dir: Option<PathBuf>,

    /// Only run this test, by name or binary (can be used multiple times)
    #[arg(long = "test", value_name = "NAME", action = ArgAction::Append)]
    pub tests: Vec<String>,

    /// Retries while the server refuses connections
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Delay before the first retry, doubled for every further retry
    #[arg(long, value_name = "MS")]
    pub initial_backoff_ms: Option<u64>,

    /// Result output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
    pub format: OutputFormat,

    /// Environment file to load instead of ./.env
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Print the planned invocations and exit without running them
    #[arg(long)]
    pub list: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose logging on stderr
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug logging on stderr
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if self.role == Some(Role::Server) && self.server_address.is_some() {
            return Err("--server-address only applies to the client role".to_string());
        }

        if self.tests.iter().any(|name| name.trim().is_empty()) {
            return Err("--test requires a non-empty name".to_string());
        }

        Ok(())
    }

    /// Color preference expressed on the command line, if any
    pub fn color_override(&self) -> Option<bool> {
        if self.color {
            Some(true)
        } else if self.no_color {
            Some(false)
        } else {
            None
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        self.color_override().unwrap_or_else(supports_color)
    }
}

/// Check if stdout is a terminal that wants color
pub fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    // Results are usually piped into a file or another script
    std::io::stdout().is_terminal()
}
