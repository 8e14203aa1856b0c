//! Error handling for the perftest sweep harness

pub mod recovery;

pub use recovery::{BackoffPolicy, Sleeper, TokioSleeper};

use thiserror::Error;

/// Custom error types for the perftest sweep harness
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Benchmark binary could not be started at all
    #[error("Failed to start benchmark: {0}")]
    Spawn(String),

    /// Benchmark exited non-zero for a reason other than a refused connection
    #[error("Command \"{command}\" failed: {stderr}")]
    CommandFailed {
        command: String,
        stderr: String,
    },

    /// I/O errors (console writes, file operations)
    #[error("I/O error: {0}")]
    Io(String),

    /// Parsing errors (benchmark output, numeric settings)
    #[error("Parsing error: {0}")]
    Parse(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    /// Create a new spawn error
    pub fn spawn<S: Into<String>>(message: S) -> Self {
        Self::Spawn(message.into())
    }

    /// Create a new command failure carrying the rendered command and its stderr
    pub fn command_failed<C: Into<String>, E: Into<String>>(command: C, stderr: E) -> Self {
        Self::CommandFailed {
            command: command.into(),
            stderr: stderr.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<S: Into<String>>(message: S) -> Self {
        Self::Io(message.into())
    }

    /// Create a new parsing error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse(message.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Get error category for logging and reporting
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::Validation(_) => "VALIDATION",
            Self::Spawn(_) => "SPAWN",
            Self::CommandFailed { .. } => "COMMAND",
            Self::Io(_) => "IO",
            Self::Parse(_) => "PARSE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// Get exit code for this error type
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Validation(_) | Self::Parse(_) => 1,
            Self::CommandFailed { .. } => 2,
            Self::Spawn(_) | Self::Io(_) => 5,
            Self::Internal(_) => 99,
        }
    }

    /// Format error for console display with color coding
    pub fn format_for_console(&self, use_color: bool) -> String {
        let category = self.category();
        let message = self.to_string();

        if use_color {
            use colored::Colorize;
            match self {
                Self::Config(_) | Self::Validation(_) | Self::Parse(_) => {
                    format!("[{}] {}", category.red().bold(), message.red())
                }
                Self::Spawn(_) | Self::CommandFailed { .. } => {
                    format!("[{}] {}", category.yellow().bold(), message.yellow())
                }
                Self::Io(_) => {
                    format!("[{}] {}", category.cyan().bold(), message.cyan())
                }
                Self::Internal(_) => {
                    format!("[{}] {}", category.bright_red().bold(), message.bright_red())
                }
            }
        } else {
            format!("[{}] {}", category, message)
        }
    }
}

// Standard library error conversions
impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::parse(format!("JSON error: {}", error))
    }
}

impl From<dotenv::Error> for AppError {
    fn from(error: dotenv::Error) -> Self {
        Self::config(format!("Environment file error: {}", error))
    }
}

/// Custom Result type for the application
pub type Result<T> = std::result::Result<T, AppError>;

/// Error reporter for operator-facing diagnostics on stderr
pub struct ErrorReporter {
    pub use_color: bool,
    pub verbose: bool,
}

impl ErrorReporter {
    /// Create a new error reporter
    pub fn new(use_color: bool, verbose: bool) -> Self {
        Self { use_color, verbose }
    }

    /// Render an error the way it is shown to the operator
    pub fn render(&self, error: &AppError) -> String {
        match error {
            // The failing command and the benchmark's own stderr, verbatim
            AppError::CommandFailed { command, stderr } => {
                format!("Error when running command \"{}\"\nDetails below:\n\n{}", command, stderr)
            }
            other => {
                let mut rendered = other.format_for_console(self.use_color);
                if self.verbose {
                    rendered.push_str(&format!("\n(exit code {})", other.exit_code()));
                }
                rendered
            }
        }
    }

    /// Report an error to the user
    pub fn report_error(&self, error: &AppError) {
        eprintln!("{}", self.render(error));
    }
}

impl Default for ErrorReporter {
    fn default() -> Self {
        Self::new(true, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_error = AppError::config("Invalid configuration");
        assert_eq!(config_error.category(), "CONFIG");
        assert_eq!(config_error.exit_code(), 1);

        let failed = AppError::command_failed("ib_read_bw -d siw0", "ibv_open_device failed");
        assert_eq!(failed.category(), "COMMAND");
        assert_eq!(failed.exit_code(), 2);
    }

    #[test]
    fn test_error_display() {
        let error = AppError::parse("token 'abc' is not a number");
        let display = error.to_string();
        assert!(display.contains("Parsing error"));
        assert!(display.contains("abc"));

        let failed = AppError::command_failed("ib_write_lat -s 4", "boom");
        assert_eq!(failed.to_string(), "Command \"ib_write_lat -s 4\" failed: boom");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::validation("test").exit_code(), 1);
        assert_eq!(AppError::spawn("test").exit_code(), 5);
        assert_eq!(AppError::io("test").exit_code(), 5);
        assert_eq!(AppError::internal("test").exit_code(), 99);
    }

    #[test]
    fn test_conversions() {
        let json_err: AppError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(json_err.category(), "PARSE");

        let io_err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
        assert_eq!(io_err.category(), "IO");
    }

    #[test]
    fn test_reporter_renders_command_failure_verbatim() {
        let reporter = ErrorReporter::new(false, false);
        let rendered = reporter.render(&AppError::command_failed("ib_read_lat -s 8", "line one\nline two"));
        assert_eq!(
            rendered,
            "Error when running command \"ib_read_lat -s 8\"\nDetails below:\n\nline one\nline two"
        );
    }

    #[test]
    fn test_reporter_plain_format() {
        let reporter = ErrorReporter::new(false, true);
        let rendered = reporter.render(&AppError::config("bad interface"));
        assert!(rendered.starts_with("[CONFIG] Configuration error: bad interface"));
        assert!(rendered.contains("exit code 1"));
    }
}
