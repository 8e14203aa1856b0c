//! Running benchmark processes

use super::CommandInvocation;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Captured result of one process execution
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutput {
    /// Exit code; `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Executes an invocation to completion. A non-zero exit is reported through
/// [`CommandOutput::exit_code`], not as an error; `Err` means the process
/// could not be run at all.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, invocation: &CommandInvocation) -> Result<CommandOutput>;
}

/// Spawns real child processes with tokio
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    async fn execute(&self, invocation: &CommandInvocation) -> Result<CommandOutput> {
        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| AppError::spawn(format!("{}: {}", invocation.program.display(), e)))?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
