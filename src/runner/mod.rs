//! Command runner: one benchmark invocation, retried while the peer refuses
//! connections
//!
//! Execution, output parsing and backoff sleeping are all injected so the
//! retry logic can be exercised against fakes.

pub mod invocation;
pub mod parser;
pub mod process;

pub use invocation::{CommandInvocation, InvocationBuilder};
pub use parser::{OutputParser, PenultimateLineParser};
pub use process::{CommandExecutor, CommandOutput, ProcessExecutor};

use crate::{
    defaults,
    error::{AppError, BackoffPolicy, Result, Sleeper, TokioSleeper},
    logging::Logger,
    models::{RunConfig, RunOutcome},
    types::Role,
};
use std::sync::Arc;

/// Runs single benchmark invocations for one role
pub struct CommandRunner {
    executor: Arc<dyn CommandExecutor>,
    parser: Arc<dyn OutputParser>,
    sleeper: Arc<dyn Sleeper>,
    policy: BackoffPolicy,
    role: Role,
    logger: Logger,
}

impl CommandRunner {
    /// Runner backed by real processes, the perftest output parser and
    /// tokio sleeps
    pub fn from_config(config: &RunConfig, logger: &Logger) -> Self {
        Self::new(
            Arc::new(ProcessExecutor::new()),
            Arc::new(PenultimateLineParser::new()),
            Arc::new(TokioSleeper),
            config.backoff.clone(),
            config.role,
        )
        .with_logger(logger.child("runner"))
    }

    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        parser: Arc<dyn OutputParser>,
        sleeper: Arc<dyn Sleeper>,
        policy: BackoffPolicy,
        role: Role,
    ) -> Self {
        Self {
            executor,
            parser,
            sleeper,
            policy,
            role,
            logger: Logger::new("runner"),
        }
    }

    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Run `invocation` until it succeeds, fails fatally, or the retry budget
    /// for refused connections is spent
    pub async fn run(&self, invocation: &CommandInvocation) -> Result<RunOutcome> {
        let mut retries: u32 = 0;

        loop {
            self.logger
                .debug("Executing benchmark")
                .field("command", invocation.to_string())
                .field("attempt", retries + 1)
                .log();

            let output = self.executor.execute(invocation).await?;

            if output.is_success() {
                return match self.role {
                    Role::Client => Ok(RunOutcome::Measured(self.parser.parse(&output.stdout)?)),
                    Role::Server => Ok(RunOutcome::Completed),
                };
            }

            if !output.stderr.contains(defaults::CONNECTION_REFUSED_MARKER) {
                let error = AppError::command_failed(invocation.to_string(), output.stderr);
                self.logger
                    .error("Benchmark failed")
                    .field("exit_code", output.exit_code)
                    .error_info(&error)
                    .log();
                return Err(error);
            }

            match self.policy.delay_for(retries) {
                Some(delay) => {
                    self.logger
                        .info("Server not accepting connections yet, backing off")
                        .field("retry", retries + 1)
                        .field("delay_ms", delay.as_millis() as u64)
                        .log();
                    self.sleeper.sleep(delay).await;
                    retries += 1;
                }
                None => {
                    let attempts = retries + 1;
                    self.logger
                        .warn("Retry budget exhausted")
                        .field("command", invocation.to_string())
                        .field("attempts", attempts)
                        .log();
                    return Ok(RunOutcome::ServerUnavailable { attempts });
                }
            }
        }
    }
}

/// Fakes shared by the runner and sweep tests
#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::models::RunResult;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Replays scripted outputs; once the script runs out, repeats `fallback`
    pub struct ScriptedExecutor {
        script: Mutex<VecDeque<CommandOutput>>,
        fallback: Option<Box<dyn Fn(&CommandInvocation) -> CommandOutput + Send + Sync>>,
        pub calls: Mutex<Vec<CommandInvocation>>,
    }

    impl ScriptedExecutor {
        pub fn new(script: Vec<CommandOutput>) -> Self {
            Self {
                script: Mutex::new(script.into()),
                fallback: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn always<F>(respond: F) -> Self
        where
            F: Fn(&CommandInvocation) -> CommandOutput + Send + Sync + 'static,
        {
            Self {
                script: Mutex::new(VecDeque::new()),
                fallback: Some(Box::new(respond)),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn invocations(&self) -> Vec<CommandInvocation> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CommandExecutor for ScriptedExecutor {
        async fn execute(&self, invocation: &CommandInvocation) -> Result<CommandOutput> {
            self.calls.lock().unwrap().push(invocation.clone());
            if let Some(output) = self.script.lock().unwrap().pop_front() {
                return Ok(output);
            }
            match &self.fallback {
                Some(respond) => Ok(respond(invocation)),
                None => Err(AppError::internal("scripted executor ran out of outputs")),
            }
        }
    }

    /// Records requested delays instead of sleeping
    #[derive(Default)]
    pub struct RecordingSleeper {
        pub delays: Mutex<Vec<Duration>>,
    }

    impl RecordingSleeper {
        pub fn recorded(&self) -> Vec<Duration> {
            self.delays.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Sleeper for RecordingSleeper {
        async fn sleep(&self, duration: Duration) {
            self.delays.lock().unwrap().push(duration);
        }
    }

    /// Counts parse calls and delegates to the perftest parser
    #[derive(Default)]
    pub struct CountingParser {
        pub calls: AtomicUsize,
    }

    impl CountingParser {
        pub fn count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl OutputParser for CountingParser {
        fn parse(&self, stdout: &str) -> Result<RunResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            PenultimateLineParser.parse(stdout)
        }
    }

    impl CommandOutput {
        pub fn success<S: Into<String>>(stdout: S) -> Self {
            Self {
                exit_code: Some(0),
                stdout: stdout.into(),
                stderr: String::new(),
            }
        }

        pub fn failure<S: Into<String>>(exit_code: i32, stderr: S) -> Self {
            Self {
                exit_code: Some(exit_code),
                stdout: String::new(),
                stderr: stderr.into(),
            }
        }
    }

    /// Value following `flag` in the argument vector, if present
    pub fn flag_value<'a>(invocation: &'a CommandInvocation, flag: &str) -> Option<&'a str> {
        invocation
            .args
            .iter()
            .position(|arg| arg == flag)
            .and_then(|index| invocation.args.get(index + 1))
            .map(String::as_str)
    }

    pub fn refused() -> CommandOutput {
        CommandOutput::failure(1, "Couldn't connect to 10.10.1.2:18515\nUnable to open file descriptor for socket connection")
    }

    /// perftest-like output whose data row echoes the requested message size
    pub fn perftest_output(invocation: &CommandInvocation) -> CommandOutput {
        let size = flag_value(invocation, "-s").unwrap_or("0");
        CommandOutput::success(format!(
            "---------------------------------------\n #bytes #iterations BW average[MB/sec]\n {}  10000  250.5\n---------------------------------------\n",
            size
        ))
    }
}
