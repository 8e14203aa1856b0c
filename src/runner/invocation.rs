//! Structured benchmark command lines

use crate::models::{RunConfig, TestSpec};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An executable plus its argument vector; never passed through a shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandInvocation {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl CommandInvocation {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument
    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append a flag followed by its value
    pub fn flag<S: ToString>(self, flag: &str, value: S) -> Self {
        self.arg(flag).arg(value.to_string())
    }
}

impl std::fmt::Display for CommandInvocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Fills the perftest argument template from a [`RunConfig`]:
/// `<binary> -d <interface> -n <iterations> -s <size> -R [server_address]`
#[derive(Debug, Clone)]
pub struct InvocationBuilder {
    interface: String,
    iterations: u32,
    server_address: Option<String>,
}

impl InvocationBuilder {
    pub fn new(config: &RunConfig) -> Self {
        Self {
            interface: config.interface.clone(),
            iterations: config.iterations,
            server_address: config.client_target().map(str::to_string),
        }
    }

    pub fn build(&self, test: &TestSpec, message_size: u64) -> CommandInvocation {
        // -R selects rdma_cm connection setup
        let invocation = CommandInvocation::new(&test.binary_path)
            .flag("-d", &self.interface)
            .flag("-n", self.iterations)
            .flag("-s", message_size)
            .arg("-R");

        match &self.server_address {
            Some(address) => invocation.arg(address.clone()),
            None => invocation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    #[test]
    fn test_client_invocation() {
        let config = RunConfig::default();
        let builder = InvocationBuilder::new(&config);
        let test = TestSpec::new("Read Throughput", "/users/sg99/perftest/ib_read_bw");

        let invocation = builder.build(&test, 64);
        assert_eq!(invocation.program, PathBuf::from("/users/sg99/perftest/ib_read_bw"));
        assert_eq!(
            invocation.args,
            vec!["-d", "siw_enp94s0f0", "-n", "10000", "-s", "64", "-R", "10.10.1.2"]
        );
        assert_eq!(
            invocation.to_string(),
            "/users/sg99/perftest/ib_read_bw -d siw_enp94s0f0 -n 10000 -s 64 -R 10.10.1.2"
        );
    }

    #[test]
    fn test_server_invocation_omits_address() {
        let config = RunConfig {
            role: Role::Server,
            ..RunConfig::default()
        };
        let builder = InvocationBuilder::new(&config);
        let invocation = builder.build(&TestSpec::new("Write Latency", "ib_write_lat"), 1);
        assert_eq!(invocation.args.last().map(String::as_str), Some("-R"));
        assert_eq!(invocation.to_string(), "ib_write_lat -d siw_enp94s0f0 -n 10000 -s 1 -R");
    }
}
