//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::models::config::{
    ENV_ENABLE_COLOR, ENV_INITIAL_BACKOFF_MS, ENV_INTERFACE, ENV_ITERATIONS, ENV_MAX_RETRIES,
    ENV_MAX_SIZE_LOG2, ENV_PERFTEST_DIR, ENV_ROLE, ENV_SERVER_ADDRESS,
};
use std::path::Path;

/// Default environment file, looked up in the working directory
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load an environment file into the process environment.
    ///
    /// An explicitly requested file must exist; the default `.env` is
    /// optional. Variables already set in the environment win over the file.
    /// Returns whether a file was loaded.
    pub fn load_env_file(explicit: Option<&Path>) -> Result<bool> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::config(format!(
                        "Environment file '{}' does not exist",
                        path.display()
                    )));
                }
                dotenv::from_path(path)
                    .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;
                Ok(true)
            }
            None => {
                let path = Path::new(DEFAULT_ENV_FILE);
                if !path.exists() {
                    return Ok(false);
                }
                dotenv::from_path(path)
                    .map_err(|e| AppError::config(format!("Failed to load .env file: {}", e)))?;
                Ok(true)
            }
        }
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            (ENV_INTERFACE, "RDMA device handed to perftest with -d", "siw_enp94s0f0"),
            (ENV_ITERATIONS, "Iterations per invocation", "10000"),
            (ENV_ROLE, "client or server", "client"),
            (ENV_SERVER_ADDRESS, "Server to connect to in client role", "10.10.1.2"),
            (ENV_MAX_SIZE_LOG2, "Sweep message sizes up to 2^N (0-32)", "16"),
            (ENV_PERFTEST_DIR, "Directory holding the perftest binaries", "/users/sg99/perftest"),
            (ENV_MAX_RETRIES, "Retries while the server refuses connections (0-16)", "5"),
            (ENV_INITIAL_BACKOFF_MS, "Delay before the first retry in milliseconds", "200"),
            (ENV_ENABLE_COLOR, "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<28} {}\n", var, description));
            help.push_str(&format!("  {:<28} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = EnvManager::load_env_file(Some(&dir.path().join("absent.env"))).unwrap_err();
        assert_eq!(err.category(), "CONFIG");
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bench.env");
        fs::write(&path, "PERFTEST_SWEEP_ENV_TEST_MARKER=loaded\n").unwrap();

        assert!(EnvManager::load_env_file(Some(&path)).unwrap());
        assert_eq!(std::env::var("PERFTEST_SWEEP_ENV_TEST_MARKER").unwrap(), "loaded");
    }

    #[test]
    fn test_env_help_lists_every_variable() {
        let help = EnvManager::display_env_help();
        for (var, _, _) in EnvManager::get_supported_env_vars() {
            assert!(help.contains(var), "missing {}", var);
        }
        assert!(help.contains("Configuration Priority"));
    }
}
