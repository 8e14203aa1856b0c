//! Structured logging for the sweep harness
//!
//! Log entries carry a timestamp, level, component name, the session id of
//! the current run and arbitrary structured fields. Everything is written to
//! stderr: stdout belongs to the benchmark results.

use crate::error::AppError;
use crate::models::RunConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{self, Write};
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Per-attempt detail: commands, retries, timings
    Debug = 0,
    /// Sweep progress
    Info = 1,
    /// Potentially harmful situations
    Warn = 2,
    /// The sweep is about to abort
    Error = 3,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[36m",    // Cyan
            LogLevel::Info => "\x1b[32m",     // Green
            LogLevel::Warn => "\x1b[33m",     // Yellow
            LogLevel::Error => "\x1b[31m",    // Red
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Session id shared by every entry of one run
    pub session_id: Option<String>,
    /// Additional structured fields
    pub fields: BTreeMap<String, serde_json::Value>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    /// Human-readable console format
    Console,
    /// JSON format for structured logging
    Json,
}

/// Logger implementation with multiple output formats
#[derive(Debug, Clone)]
pub struct Logger {
    min_level: LogLevel,
    use_color: bool,
    format: LogFormat,
    name: String,
    session_id: Option<String>,
}

impl Logger {
    /// Create a new logger
    pub fn new(name: &str) -> Self {
        Self {
            min_level: LogLevel::Warn,
            use_color: false,
            format: LogFormat::Console,
            name: name.to_string(),
            session_id: None,
        }
    }

    /// Create a logger with specific configuration
    pub fn with_config(name: &str, config: &RunConfig) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            min_level,
            use_color: config.enable_color,
            format: if config.debug { LogFormat::Json } else { LogFormat::Console },
            name: name.to_string(),
            session_id: Some(Uuid::new_v4().to_string()),
        }
    }

    /// Derive a logger for another component that shares this run's session
    pub fn child(&self, name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..self.clone()
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    /// Convenience methods for different log levels
    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    pub fn error(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Error, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn write_entry(&self, entry: &LogEntry) {
        if !self.would_log(entry.level) {
            return;
        }
        let output = self.format_entry(entry);
        let _ = writeln!(io::stderr(), "{}", output);
    }

    /// Render an entry in the configured format
    pub fn format_entry(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Console => self.format_console(entry),
            LogFormat::Json => self.format_json(entry),
        }
    }

    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}",
            timestamp,
            formatted_level,
            entry.logger,
            entry.message
        );

        if !entry.fields.is_empty() {
            let fields_str: Vec<String> = entry.fields.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            output.push_str(&format!(" {{{}}}", fields_str.join(", ")));
        }

        output
    }

    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!("{{\"error\": \"Failed to serialize log entry\", \"message\": \"{}\"}}", entry.message),
        }
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                session_id: logger.session_id.clone(),
                fields: BTreeMap::new(),
            },
        }
    }

    /// Attach a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Attach error category and message
    pub fn error_info(self, error: &AppError) -> Self {
        self.field("error_category", error.category())
            .field("error_message", error.to_string())
    }

    /// Finish the entry without writing it
    pub fn build(self) -> LogEntry {
        self.entry
    }

    /// Write the entry if the logger's level allows it
    pub fn log(self) {
        self.logger.write_entry(&self.entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(verbose: bool, debug: bool) -> RunConfig {
        RunConfig {
            verbose,
            debug,
            enable_color: false,
            ..RunConfig::default()
        }
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Warn < LogLevel::Error);
        assert_eq!(LogLevel::Warn.as_str(), "WARN");
    }

    #[test]
    fn test_levels_follow_config() {
        let quiet = Logger::with_config("sweep", &test_config(false, false));
        assert!(!quiet.would_log(LogLevel::Info));
        assert!(quiet.would_log(LogLevel::Warn));

        let verbose = Logger::with_config("sweep", &test_config(true, false));
        assert!(verbose.would_log(LogLevel::Info));
        assert!(!verbose.would_log(LogLevel::Debug));

        let debug = Logger::with_config("sweep", &test_config(false, true));
        assert!(debug.would_log(LogLevel::Debug));
        assert!(debug.session_id().is_some());
    }

    #[test]
    fn test_console_format() {
        let logger = Logger::new("runner");
        let entry = logger
            .warn("retrying")
            .field("attempt", 2)
            .field("delay_ms", 400)
            .build();
        let line = logger.format_entry(&entry);
        assert!(line.contains(" WARN [runner] retrying"));
        assert!(line.contains("{attempt=2, delay_ms=400}"));
    }

    #[test]
    fn test_json_format() {
        let logger = Logger::with_config("sweep", &test_config(false, true));
        let entry = logger
            .info("test started")
            .field("test", "Read Latency")
            .build();
        let line = logger.format_entry(&entry);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["level"], "Info");
        assert_eq!(parsed["logger"], "sweep");
        assert_eq!(parsed["fields"]["test"], "Read Latency");
        assert_eq!(parsed["session_id"].as_str(), logger.session_id());
    }

    #[test]
    fn test_child_shares_session() {
        let logger = Logger::with_config("main", &test_config(false, false));
        let child = logger.child("runner");
        assert_eq!(child.session_id(), logger.session_id());

        let entry = child.error("boom").error_info(&AppError::spawn("missing binary")).build();
        let line = child.format_entry(&entry);
        assert!(line.contains("ERROR [runner] boom"));
        assert_eq!(entry.fields["error_category"], "SPAWN");
    }
}
