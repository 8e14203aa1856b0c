//! Sweep driver: every configured test across every message size
//!
//! Tests run in configured order; within a test, message sizes run from
//! 2^0 up to 2^max_message_size_log2. Invocations are strictly sequential and
//! the first fatal error or unreachable server ends the whole sweep.

use crate::{
    error::Result,
    logging::Logger,
    models::{RunConfig, RunOutcome},
    output::SweepReporter,
    runner::{CommandInvocation, CommandRunner, InvocationBuilder},
};
use serde::Serialize;
use std::time::{Duration, Instant};

/// One cell of the benchmark matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedRun {
    pub test: String,
    pub step: u32,
    pub message_size: u64,
    pub invocation: CommandInvocation,
}

/// Bookkeeping for a sweep that ran to the end
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SweepSummary {
    pub tests: usize,
    pub invocations: usize,
    pub elapsed: Duration,
}

/// How a sweep ended, short of a fatal error
#[derive(Debug, Clone, PartialEq)]
pub enum SweepOutcome {
    Completed(SweepSummary),
    /// The peer never accepted a connection; later sizes and tests were skipped
    ServerUnavailable {
        test: String,
        message_size: u64,
        attempts: u32,
    },
}

pub struct SweepDriver<R: SweepReporter> {
    config: RunConfig,
    runner: CommandRunner,
    builder: InvocationBuilder,
    reporter: R,
    logger: Logger,
}

impl<R: SweepReporter> SweepDriver<R> {
    /// Rejects configurations that fail [`RunConfig::validate`], so every
    /// planned message size fits in a `u64`
    pub fn new(config: RunConfig, runner: CommandRunner, reporter: R) -> Result<Self> {
        config.validate()?;
        let builder = InvocationBuilder::new(&config);
        Ok(Self {
            config,
            runner,
            builder,
            reporter,
            logger: Logger::new("sweep"),
        })
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The full ordered invocation matrix, without running anything
    pub fn plan(&self) -> Vec<PlannedRun> {
        let builder = &self.builder;
        let last_step = self.config.max_message_size_log2;
        self.config
            .tests
            .iter()
            .flat_map(move |test| {
                (0..=last_step).map(move |step| {
                    let message_size = RunConfig::message_size(step);
                    PlannedRun {
                        test: test.name.clone(),
                        step,
                        message_size,
                        invocation: builder.build(test, message_size),
                    }
                })
            })
            .collect()
    }

    pub async fn run(&mut self) -> Result<SweepOutcome> {
        let started = Instant::now();
        let last_step = self.config.max_message_size_log2;
        let mut invocations = 0usize;

        self.reporter.banner(self.config.role, self.config.client_target())?;

        for test in &self.config.tests {
            self.logger
                .info("Starting test")
                .field("test", &test.name)
                .field("binary", test.binary_path.display().to_string())
                .log();
            self.reporter.test_started(test)?;

            for step in 0..=last_step {
                let message_size = RunConfig::message_size(step);
                let invocation = self.builder.build(test, message_size);

                let outcome = match self.runner.run(&invocation).await {
                    Ok(outcome) => outcome,
                    Err(error) => {
                        self.reporter.interrupted()?;
                        self.logger
                            .error("Sweep aborted")
                            .field("test", &test.name)
                            .field("message_size", message_size)
                            .error_info(&error)
                            .log();
                        return Err(error);
                    }
                };
                invocations += 1;

                match outcome {
                    RunOutcome::Measured(result) => {
                        self.reporter.result(test, message_size, &result)?;
                    }
                    RunOutcome::Completed => {
                        self.reporter.progress(test, step, last_step)?;
                    }
                    RunOutcome::ServerUnavailable { attempts } => {
                        self.reporter.server_unavailable(test, message_size, attempts)?;
                        return Ok(SweepOutcome::ServerUnavailable {
                            test: test.name.clone(),
                            message_size,
                            attempts,
                        });
                    }
                }
            }

            self.reporter.test_finished(test)?;
        }

        let summary = SweepSummary {
            tests: self.config.tests.len(),
            invocations,
            elapsed: started.elapsed(),
        };
        self.logger
            .info("Sweep complete")
            .field("tests", summary.tests)
            .field("invocations", summary.invocations)
            .field("elapsed_ms", summary.elapsed.as_millis() as u64)
            .log();
        Ok(SweepOutcome::Completed(summary))
    }
}
