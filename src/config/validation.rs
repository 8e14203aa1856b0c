//! Configuration checks that warn instead of failing

use crate::{
    error::Result,
    models::RunConfig,
};
use std::time::Duration;

/// Message sizes above 2^23 (8 MiB) exceed what perftest accepts by default
const PERFTEST_MAX_SIZE_LOG2: u32 = 23;
const LOW_ITERATION_COUNT: u32 = 1000;
const LONG_BACKOFF: Duration = Duration::from_secs(60);

/// Configuration validator with advisory rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Hard validation first, then advisory warnings
    pub fn validate_comprehensive(config: &RunConfig) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_binaries(config));
        warnings.extend(Self::validate_sweep_settings(config));
        Ok(warnings)
    }

    fn validate_binaries(config: &RunConfig) -> Vec<ValidationWarning> {
        config
            .tests
            .iter()
            .filter(|test| !test.binary_path.exists())
            .map(|test| {
                ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Binary for '{}' not found at {}", test.name, test.binary_path.display()),
                )
            })
            .collect()
    }

    fn validate_sweep_settings(config: &RunConfig) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.max_message_size_log2 > PERFTEST_MAX_SIZE_LOG2 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Message sizes up to 2^{} exceed perftest's usual 2^{} limit",
                    config.max_message_size_log2, PERFTEST_MAX_SIZE_LOG2
                ),
            ));
        }

        if config.iterations < LOW_ITERATION_COUNT {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Only {} iterations per invocation; results may be noisy", config.iterations),
            ));
        }

        if !config.is_client() && config.server_address.is_some() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "Server address is ignored in the server role".to_string(),
            ));
        }

        let total_backoff = config.backoff.total_delay();
        if total_backoff > LONG_BACKOFF {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!(
                    "A refused connection may wait up to {}s before giving up",
                    total_backoff.as_secs()
                ),
            ));
        }

        warnings
    }
}

/// Severity of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
}

impl ValidationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationLevel::Info => "INFO",
            ValidationLevel::Warning => "WARNING",
        }
    }
}

/// One advisory finding
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        if use_color {
            use colored::Colorize;
            let tag = match self.level {
                ValidationLevel::Info => self.level.as_str().blue(),
                ValidationLevel::Warning => self.level.as_str().yellow(),
            };
            format!("[{}] {}", tag, self.message)
        } else {
            format!("[{}] {}", self.level.as_str(), self.message)
        }
    }
}

/// Run comprehensive validation on a configuration
pub fn validate_config(config: &RunConfig) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BackoffPolicy;
    use crate::types::Role;
    use std::fs;
    use tempfile::TempDir;

    fn config_with_binaries(dir: &TempDir) -> RunConfig {
        let mut config = RunConfig::default();
        config.set_perftest_dir(dir.path());
        for test in &config.tests {
            fs::write(&test.binary_path, "#!/bin/sh\n").unwrap();
        }
        config
    }

    #[test]
    fn test_reference_config_only_warns_about_binaries() {
        let dir = TempDir::new().unwrap();
        let warnings = validate_config(&config_with_binaries(&dir)).unwrap();
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn test_missing_binaries_warn() {
        let dir = TempDir::new().unwrap();
        let mut config = RunConfig::default();
        config.set_perftest_dir(dir.path());
        let warnings = validate_config(&config).unwrap();
        assert_eq!(warnings.len(), 4);
        assert!(warnings.iter().all(|w| w.level == ValidationLevel::Warning));
        assert!(warnings[0].message.contains("ib_read_bw"));
    }

    #[test]
    fn test_advisory_rules() {
        let dir = TempDir::new().unwrap();
        let config = RunConfig {
            iterations: 10,
            max_message_size_log2: 30,
            role: Role::Server,
            backoff: BackoffPolicy::new(10, Duration::from_millis(200)),
            ..config_with_binaries(&dir)
        };
        let warnings = validate_config(&config).unwrap();
        assert_eq!(warnings.len(), 4);
        assert_eq!(warnings[0].format(false), "[WARNING] Message sizes up to 2^30 exceed perftest's usual 2^23 limit");
        assert!(warnings.iter().any(|w| w.message.contains("10 iterations")));
        assert!(warnings.iter().any(|w| w.message.contains("ignored in the server role")));
        assert!(warnings.iter().any(|w| w.message.contains("204s")));
    }

    #[test]
    fn test_hard_errors_propagate() {
        let config = RunConfig {
            iterations: 0,
            ..RunConfig::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
