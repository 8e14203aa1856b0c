//! Run configuration data model and validation

use crate::defaults;
use crate::error::BackoffPolicy;
use crate::models::TestSpec;
use crate::types::{AppError, OutputFormat, Result, Role};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variables understood by [`RunConfig::merge_from_env`]
pub const ENV_INTERFACE: &str = "PERFTEST_INTERFACE";
pub const ENV_ITERATIONS: &str = "PERFTEST_ITERATIONS";
pub const ENV_ROLE: &str = "PERFTEST_ROLE";
pub const ENV_SERVER_ADDRESS: &str = "PERFTEST_SERVER_ADDRESS";
pub const ENV_MAX_SIZE_LOG2: &str = "PERFTEST_MAX_SIZE_LOG2";
pub const ENV_PERFTEST_DIR: &str = "PERFTEST_DIR";
pub const ENV_MAX_RETRIES: &str = "PERFTEST_MAX_RETRIES";
pub const ENV_INITIAL_BACKOFF_MS: &str = "PERFTEST_INITIAL_BACKOFF_MS";
pub const ENV_ENABLE_COLOR: &str = "ENABLE_COLOR";

/// Longest initial backoff accepted by validation
const MAX_INITIAL_BACKOFF: Duration = Duration::from_secs(60);

/// Everything a sweep needs, fixed before the first benchmark runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// RDMA device handed to perftest with `-d`
    pub interface: String,

    /// Iterations per invocation (`-n`)
    pub iterations: u32,

    /// Client or server side of the transfer
    pub role: Role,

    /// Peer to connect to; required for the client role
    pub server_address: Option<String>,

    /// Sweep message sizes 2^0 ..= 2^max_message_size_log2
    pub max_message_size_log2: u32,

    /// Directory holding the perftest binaries
    pub perftest_dir: PathBuf,

    /// Tests to run, in order
    pub tests: Vec<TestSpec>,

    /// Retry schedule for refused connections
    pub backoff: BackoffPolicy,

    #[serde(default)]
    pub output_format: OutputFormat,

    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    #[serde(default)]
    pub verbose: bool,

    #[serde(default)]
    pub debug: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        let perftest_dir = PathBuf::from(defaults::DEFAULT_PERFTEST_DIR);
        Self {
            interface: defaults::DEFAULT_INTERFACE.to_string(),
            iterations: defaults::DEFAULT_ITERATIONS,
            role: Role::Client,
            server_address: Some(defaults::DEFAULT_SERVER_ADDRESS.to_string()),
            max_message_size_log2: defaults::DEFAULT_MAX_MESSAGE_SIZE_LOG2,
            tests: TestSpec::standard_suite(&perftest_dir),
            perftest_dir,
            backoff: BackoffPolicy::default(),
            output_format: OutputFormat::Plain,
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl RunConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_client(&self) -> bool {
        self.role.is_client()
    }

    /// Address appended to client invocations; `None` in server mode
    pub fn client_target(&self) -> Option<&str> {
        if self.is_client() {
            self.server_address.as_deref()
        } else {
            None
        }
    }

    /// Message size for sweep step `exponent`
    pub fn message_size(exponent: u32) -> u64 {
        1u64 << exponent
    }

    /// Point the standard suite at another perftest directory
    pub fn set_perftest_dir<P: Into<PathBuf>>(&mut self, dir: P) {
        self.perftest_dir = dir.into();
        self.tests = TestSpec::standard_suite(&self.perftest_dir);
    }

    /// Keep only the tests named by `selectors`, preserving sweep order
    pub fn select_tests(&mut self, selectors: &[String]) -> Result<()> {
        if selectors.is_empty() {
            return Ok(());
        }

        for selector in selectors {
            if !self.tests.iter().any(|test| test.matches(selector)) {
                let known: Vec<&str> = self.tests.iter().map(|t| t.name.as_str()).collect();
                return Err(AppError::config(format!(
                    "Unknown test '{}'. Known tests: {}",
                    selector,
                    known.join(", ")
                )));
            }
        }

        self.tests.retain(|test| selectors.iter().any(|selector| test.matches(selector)));
        Ok(())
    }

    /// Validate the configuration and return the first problem found
    pub fn validate(&self) -> Result<()> {
        if self.interface.trim().is_empty() {
            return Err(AppError::config("Interface name cannot be empty"));
        }
        if self.interface.chars().any(char::is_whitespace) {
            return Err(AppError::config(format!("Interface name '{}' cannot contain whitespace", self.interface)));
        }

        if self.iterations == 0 {
            return Err(AppError::config("Iteration count must be greater than 0"));
        }
        if self.iterations > defaults::MAX_ITERATIONS {
            return Err(AppError::config(format!("Iteration count cannot exceed {}", defaults::MAX_ITERATIONS)));
        }

        if self.max_message_size_log2 > defaults::MAX_MESSAGE_SIZE_LOG2 {
            return Err(AppError::config(format!(
                "Maximum message size exponent cannot exceed {}, got {}",
                defaults::MAX_MESSAGE_SIZE_LOG2,
                self.max_message_size_log2
            )));
        }

        if self.is_client() {
            match self.server_address.as_deref().map(str::trim) {
                None | Some("") => {
                    return Err(AppError::config("Client role requires a server address"));
                }
                Some(address) if address.chars().any(char::is_whitespace) => {
                    return Err(AppError::config(format!("Server address '{}' cannot contain whitespace", address)));
                }
                Some(_) => {}
            }
        }

        if self.tests.is_empty() {
            return Err(AppError::config("At least one test must be selected"));
        }

        if self.backoff.max_retries > defaults::MAX_RETRIES {
            return Err(AppError::config(format!("Retry count cannot exceed {}", defaults::MAX_RETRIES)));
        }
        if self.backoff.initial_delay.is_zero() {
            return Err(AppError::config("Initial backoff must be greater than 0"));
        }
        if self.backoff.initial_delay > MAX_INITIAL_BACKOFF {
            return Err(AppError::config(format!(
                "Initial backoff cannot exceed {}ms",
                MAX_INITIAL_BACKOFF.as_millis()
            )));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_lookup(|key| std::env::var(key).ok())
    }

    /// Merge settings from any key/value source shaped like the environment
    pub fn merge_from_lookup<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(interface) = lookup(ENV_INTERFACE) {
            self.interface = interface.trim().to_string();
        }

        if let Some(iterations) = lookup(ENV_ITERATIONS) {
            self.iterations = iterations.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", ENV_ITERATIONS, iterations, e)))?;
        }

        if let Some(role) = lookup(ENV_ROLE) {
            self.role = role.parse()
                .map_err(|e| AppError::config(format!("Invalid {} value: {}", ENV_ROLE, e)))?;
        }

        if let Some(address) = lookup(ENV_SERVER_ADDRESS) {
            let address = address.trim();
            self.server_address = if address.is_empty() { None } else { Some(address.to_string()) };
        }

        if let Some(max_log2) = lookup(ENV_MAX_SIZE_LOG2) {
            self.max_message_size_log2 = max_log2.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", ENV_MAX_SIZE_LOG2, max_log2, e)))?;
        }

        if let Some(dir) = lookup(ENV_PERFTEST_DIR) {
            self.set_perftest_dir(dir.trim());
        }

        if let Some(retries) = lookup(ENV_MAX_RETRIES) {
            self.backoff.max_retries = retries.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", ENV_MAX_RETRIES, retries, e)))?;
        }

        if let Some(backoff_ms) = lookup(ENV_INITIAL_BACKOFF_MS) {
            let millis: u64 = backoff_ms.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", ENV_INITIAL_BACKOFF_MS, backoff_ms, e)))?;
            self.backoff.initial_delay = Duration::from_millis(millis);
        }

        if let Some(enable_color) = lookup(ENV_ENABLE_COLOR) {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", ENV_ENABLE_COLOR, enable_color, e)))?;
        }

        Ok(())
    }
}

fn default_enable_color() -> bool {
    defaults::DEFAULT_ENABLE_COLOR
}
