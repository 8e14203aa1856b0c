//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::{supports_color, Cli},
    config::env::EnvManager,
    error::Result,
    models::{config::ENV_SERVER_ADDRESS, RunConfig},
};
use std::time::Duration;

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    /// Create a new configuration parser with CLI arguments
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Parse and build the complete configuration
    pub fn parse(&self) -> Result<RunConfig> {
        EnvManager::load_env_file(self.cli.env_file.as_deref())?;
        self.parse_with_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from defaults, `lookup` and the CLI, in that order
    pub fn parse_with_lookup<F>(&self, lookup: F) -> Result<RunConfig>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = RunConfig::default();
        config.merge_from_lookup(&lookup)?;
        self.apply_cli_overrides(&mut config);

        // The built-in default address only applies to clients
        if !config.is_client() && self.cli.server_address.is_none() && lookup(ENV_SERVER_ADDRESS).is_none() {
            config.server_address = None;
        }
        config.select_tests(&self.cli.tests)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut RunConfig) {
        let cli = &self.cli;

        if let Some(ref interface) = cli.interface {
            config.interface = interface.clone();
        }
        if let Some(iterations) = cli.iterations {
            config.iterations = iterations;
        }
        if let Some(role) = cli.role {
            config.role = role;
        }
        if let Some(ref address) = cli.server_address {
            config.server_address = Some(address.clone());
        }
        if let Some(max_log2) = cli.max_size_log2 {
            config.max_message_size_log2 = max_log2;
        }
        if let Some(ref dir) = cli.perftest_dir {
            config.set_perftest_dir(dir.clone());
        }
        if let Some(retries) = cli.max_retries {
            config.backoff.max_retries = retries;
        }
        if let Some(millis) = cli.initial_backoff_ms {
            config.backoff.initial_delay = Duration::from_millis(millis);
        }

        // ENABLE_COLOR=true still stays plain when stdout is not a terminal
        config.enable_color = cli
            .color_override()
            .unwrap_or_else(|| config.enable_color && supports_color());

        config.output_format = cli.format;
        config.verbose = cli.verbose;
        config.debug = cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<RunConfig> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &RunConfig) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Role: {}", config.role));
    if let Some(address) = config.client_target() {
        summary.push(format!("Server Address: {}", address));
    }
    summary.push(format!("Interface: {}", config.interface));
    summary.push(format!("Iterations: {}", config.iterations));
    summary.push(format!(
        "Message Sizes: 1..={} bytes ({} steps)",
        RunConfig::message_size(config.max_message_size_log2),
        config.max_message_size_log2 + 1
    ));
    summary.push(format!("Perftest Directory: {}", config.perftest_dir.display()));
    summary.push(format!(
        "Tests: {}",
        config.tests.iter().map(|t| t.name.as_str()).collect::<Vec<_>>().join(", ")
    ));
    summary.push(format!(
        "Retries: {} (initial backoff {}ms)",
        config.backoff.max_retries,
        config.backoff.initial_delay.as_millis()
    ));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}
