//! Plain console output

use super::SweepReporter;
use crate::{
    error::Result,
    models::{RunResult, TestSpec},
    types::Role,
};
use colored::Colorize;
use std::io::Write;

/// Writes the human-readable result stream.
///
/// Client runs print one space-joined line per message size. Server runs
/// rewrite a single progress line in place with a carriage return.
pub struct PlainReporter<W: Write> {
    out: W,
    use_color: bool,
    progress_open: bool,
}

impl<W: Write> PlainReporter<W> {
    pub fn new(out: W, use_color: bool) -> Self {
        Self {
            out,
            use_color,
            progress_open: false,
        }
    }

    fn close_progress_line(&mut self) -> Result<()> {
        if self.progress_open {
            writeln!(self.out)?;
            self.progress_open = false;
        }
        Ok(())
    }
}

impl<W: Write> SweepReporter for PlainReporter<W> {
    fn banner(&mut self, role: Role, server_address: Option<&str>) -> Result<()> {
        match (role, server_address) {
            (Role::Client, Some(address)) => {
                writeln!(self.out, "Running performance tests as client with server {}.", address)?
            }
            _ => writeln!(self.out, "Running performance tests as {}.", role)?,
        }
        Ok(())
    }

    fn test_started(&mut self, test: &TestSpec) -> Result<()> {
        self.close_progress_line()?;
        let name = if self.use_color {
            test.name.bold().cyan().to_string()
        } else {
            test.name.clone()
        };
        writeln!(self.out, "\nRunning test: \"{}\"", name)?;
        Ok(())
    }

    fn result(&mut self, _test: &TestSpec, _message_size: u64, result: &RunResult) -> Result<()> {
        writeln!(self.out, "{}", result.to_line())?;
        Ok(())
    }

    fn progress(&mut self, _test: &TestSpec, step: u32, last_step: u32) -> Result<()> {
        write!(self.out, "\rTest {}/{} complete.", step, last_step)?;
        self.out.flush()?;
        self.progress_open = true;
        Ok(())
    }

    fn test_finished(&mut self, _test: &TestSpec) -> Result<()> {
        self.close_progress_line()?;
        self.out.flush()?;
        Ok(())
    }

    fn server_unavailable(&mut self, _test: &TestSpec, _message_size: u64, _attempts: u32) -> Result<()> {
        self.close_progress_line()?;
        let message = "Timeout exceeded. Server doesn't appear to be up!";
        if self.use_color {
            writeln!(self.out, "{}", message.yellow())?;
        } else {
            writeln!(self.out, "{}", message)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn interrupted(&mut self) -> Result<()> {
        self.close_progress_line()?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(reporter: PlainReporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.out).unwrap()
    }

    fn read_bw() -> TestSpec {
        TestSpec::new("Read Throughput", "/opt/perftest/ib_read_bw")
    }

    #[test]
    fn test_client_stream() {
        let mut reporter = PlainReporter::new(Vec::new(), false);
        let test = read_bw();
        reporter.banner(Role::Client, Some("10.10.1.2")).unwrap();
        reporter.test_started(&test).unwrap();
        reporter.result(&test, 1, &vec![1.0, 10000.0, 250.5].into()).unwrap();
        reporter.result(&test, 2, &vec![2.0, 10000.0, 12.25].into()).unwrap();
        reporter.test_finished(&test).unwrap();

        assert_eq!(
            rendered(reporter),
            "Running performance tests as client with server 10.10.1.2.\n\
             \nRunning test: \"Read Throughput\"\n\
             1.0 10000.0 250.5\n\
             2.0 10000.0 12.25\n"
        );
    }

    #[test]
    fn test_server_progress_overwrites_in_place() {
        let mut reporter = PlainReporter::new(Vec::new(), false);
        let test = read_bw();
        reporter.banner(Role::Server, None).unwrap();
        reporter.test_started(&test).unwrap();
        for step in 0..=2 {
            reporter.progress(&test, step, 2).unwrap();
        }
        reporter.test_finished(&test).unwrap();

        assert_eq!(
            rendered(reporter),
            "Running performance tests as server.\n\
             \nRunning test: \"Read Throughput\"\n\
             \rTest 0/2 complete.\rTest 1/2 complete.\rTest 2/2 complete.\n"
        );
    }

    #[test]
    fn test_server_unavailable_closes_progress() {
        let mut reporter = PlainReporter::new(Vec::new(), false);
        let test = read_bw();
        reporter.progress(&test, 0, 4).unwrap();
        reporter.server_unavailable(&test, 2, 6).unwrap();
        assert_eq!(
            rendered(reporter),
            "\rTest 0/4 complete.\nTimeout exceeded. Server doesn't appear to be up!\n"
        );
    }

    #[test]
    fn test_interrupted_without_progress_writes_nothing() {
        let mut reporter = PlainReporter::new(Vec::new(), false);
        reporter.interrupted().unwrap();
        assert!(reporter.out.is_empty());
    }
}
