//! JSON lines output

use super::SweepReporter;
use crate::{
    error::Result,
    models::{RunResult, TestSpec},
    types::Role,
};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ReportEvent<'a> {
    Banner {
        role: Role,
        server_address: Option<&'a str>,
    },
    TestStarted {
        test: &'a str,
        binary: String,
    },
    Result {
        test: &'a str,
        message_size: u64,
        values: &'a [f64],
    },
    Progress {
        test: &'a str,
        step: u32,
        last_step: u32,
    },
    TestFinished {
        test: &'a str,
    },
    ServerUnavailable {
        test: &'a str,
        message_size: u64,
        attempts: u32,
    },
}

/// Emits one JSON object per sweep event
pub struct JsonReporter<W: Write> {
    out: W,
}

impl<W: Write> JsonReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn emit(&mut self, event: &ReportEvent<'_>) -> Result<()> {
        serde_json::to_writer(&mut self.out, event)?;
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> SweepReporter for JsonReporter<W> {
    fn banner(&mut self, role: Role, server_address: Option<&str>) -> Result<()> {
        self.emit(&ReportEvent::Banner { role, server_address })
    }

    fn test_started(&mut self, test: &TestSpec) -> Result<()> {
        self.emit(&ReportEvent::TestStarted {
            test: &test.name,
            binary: test.binary_path.display().to_string(),
        })
    }

    fn result(&mut self, test: &TestSpec, message_size: u64, result: &RunResult) -> Result<()> {
        self.emit(&ReportEvent::Result {
            test: &test.name,
            message_size,
            values: &result.values,
        })
    }

    fn progress(&mut self, test: &TestSpec, step: u32, last_step: u32) -> Result<()> {
        self.emit(&ReportEvent::Progress {
            test: &test.name,
            step,
            last_step,
        })
    }

    fn test_finished(&mut self, test: &TestSpec) -> Result<()> {
        self.emit(&ReportEvent::TestFinished { test: &test.name })
    }

    fn server_unavailable(&mut self, test: &TestSpec, message_size: u64, attempts: u32) -> Result<()> {
        self.emit(&ReportEvent::ServerUnavailable {
            test: &test.name,
            message_size,
            attempts,
        })
    }

    fn interrupted(&mut self) -> Result<()> {
        Ok(())
    }
}
