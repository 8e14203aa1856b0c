//! Output of sweep results
//!
//! Results stream to stdout as they arrive, either as the plain text lines a
//! downstream script scrapes or as one JSON object per line.

mod json;
mod plain;

pub use json::JsonReporter;
pub use plain::PlainReporter;

use crate::{
    error::Result,
    models::{RunResult, TestSpec},
    types::{OutputFormat, Role},
};
use std::io::Write;

/// Receives sweep events in the order they happen
pub trait SweepReporter {
    /// Announce which side of the transfer this run drives
    fn banner(&mut self, role: Role, server_address: Option<&str>) -> Result<()>;

    /// A test's sweep is about to start
    fn test_started(&mut self, test: &TestSpec) -> Result<()>;

    /// Numbers from one client invocation
    fn result(&mut self, test: &TestSpec, message_size: u64, result: &RunResult) -> Result<()>;

    /// A server invocation finished; `step` of `last_step` (both inclusive)
    fn progress(&mut self, test: &TestSpec, step: u32, last_step: u32) -> Result<()>;

    /// A test's sweep finished
    fn test_finished(&mut self, test: &TestSpec) -> Result<()>;

    /// The peer never came up; the sweep stops here
    fn server_unavailable(&mut self, test: &TestSpec, message_size: u64, attempts: u32) -> Result<()>;

    /// The sweep is aborting on a fatal error
    fn interrupted(&mut self) -> Result<()>;
}

impl<R: SweepReporter + ?Sized> SweepReporter for Box<R> {
    fn banner(&mut self, role: Role, server_address: Option<&str>) -> Result<()> {
        (**self).banner(role, server_address)
    }

    fn test_started(&mut self, test: &TestSpec) -> Result<()> {
        (**self).test_started(test)
    }

    fn result(&mut self, test: &TestSpec, message_size: u64, result: &RunResult) -> Result<()> {
        (**self).result(test, message_size, result)
    }

    fn progress(&mut self, test: &TestSpec, step: u32, last_step: u32) -> Result<()> {
        (**self).progress(test, step, last_step)
    }

    fn test_finished(&mut self, test: &TestSpec) -> Result<()> {
        (**self).test_finished(test)
    }

    fn server_unavailable(&mut self, test: &TestSpec, message_size: u64, attempts: u32) -> Result<()> {
        (**self).server_unavailable(test, message_size, attempts)
    }

    fn interrupted(&mut self) -> Result<()> {
        (**self).interrupted()
    }
}

/// Builds the reporter matching the configured output format
pub struct ReporterFactory;

impl ReporterFactory {
    pub fn create_reporter<W: Write + 'static>(
        format: OutputFormat,
        out: W,
        enable_color: bool,
    ) -> Box<dyn SweepReporter> {
        match format {
            OutputFormat::Plain => Box::new(PlainReporter::new(out, enable_color)),
            OutputFormat::Json => Box::new(JsonReporter::new(out)),
        }
    }

    /// Reporter writing to this process's stdout
    pub fn create_stdout_reporter(format: OutputFormat, enable_color: bool) -> Box<dyn SweepReporter> {
        Self::create_reporter(format, std::io::stdout(), enable_color)
    }
}
