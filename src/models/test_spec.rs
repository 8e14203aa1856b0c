//! Benchmark binaries swept by the harness

use crate::defaults;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One named perftest binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSpec {
    /// Display name, e.g. "Read Throughput"
    pub name: String,
    /// Path of the executable to run
    pub binary_path: PathBuf,
}

impl TestSpec {
    pub fn new<N: Into<String>, P: Into<PathBuf>>(name: N, binary_path: P) -> Self {
        Self {
            name: name.into(),
            binary_path: binary_path.into(),
        }
    }

    /// The four standard tests (read/write throughput and latency) under `dir`,
    /// in sweep order
    pub fn standard_suite(dir: &Path) -> Vec<TestSpec> {
        defaults::DEFAULT_TESTS
            .iter()
            .map(|(name, binary)| TestSpec::new(*name, dir.join(binary)))
            .collect()
    }

    /// File name of the executable, e.g. "ib_read_bw"
    pub fn binary_name(&self) -> Option<&str> {
        self.binary_path.file_name().and_then(|name| name.to_str())
    }

    /// Whether `selector` names this test, by display name (case-insensitive)
    /// or by binary file name
    pub fn matches(&self, selector: &str) -> bool {
        let selector = selector.trim();
        self.name.eq_ignore_ascii_case(selector) || self.binary_name() == Some(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_suite_order() {
        let suite = TestSpec::standard_suite(Path::new("/opt/perftest"));
        let names: Vec<&str> = suite.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["Read Throughput", "Read Latency", "Write Throughput", "Write Latency"]);
        assert_eq!(suite[0].binary_path, PathBuf::from("/opt/perftest/ib_read_bw"));
        assert_eq!(suite[3].binary_name(), Some("ib_write_lat"));
    }

    #[test]
    fn test_matches() {
        let spec = TestSpec::new("Write Latency", "/opt/perftest/ib_write_lat");
        assert!(spec.matches("write latency"));
        assert!(spec.matches("ib_write_lat"));
        assert!(!spec.matches("ib_write_bw"));
        assert!(!spec.matches("Write"));
    }
}
