//! Scraping numbers out of benchmark stdout

use crate::error::{AppError, Result};
use crate::models::RunResult;

/// Turns a successful client run's stdout into numbers
pub trait OutputParser: Send + Sync {
    fn parse(&self, stdout: &str) -> Result<RunResult>;
}

/// Reads the second-to-last line of output as whitespace-separated decimals.
///
/// perftest prints its result row followed by a closing separator line, so
/// the data sits one line above the end.
#[derive(Debug, Default, Clone, Copy)]
pub struct PenultimateLineParser;

impl PenultimateLineParser {
    pub fn new() -> Self {
        Self
    }

    /// The line the numbers are read from
    pub fn data_line(stdout: &str) -> Result<&str> {
        let lines: Vec<&str> = stdout.lines().collect();
        if lines.len() < 2 {
            return Err(AppError::parse(format!(
                "expected at least 2 lines of benchmark output, got {}",
                lines.len()
            )));
        }
        Ok(lines[lines.len() - 2])
    }
}

impl OutputParser for PenultimateLineParser {
    fn parse(&self, stdout: &str) -> Result<RunResult> {
        let line = Self::data_line(stdout)?;
        let values = line
            .split_whitespace()
            .map(|token| {
                token.parse::<f64>().map_err(|e| {
                    AppError::parse(format!("'{}' in line '{}' is not a number: {}", token, line.trim(), e))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        Ok(RunResult::new(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        let stdout = "header\n  1000000  250.5   12.3 \n------\n";
        let result = PenultimateLineParser.parse(stdout).unwrap();
        assert_eq!(result.values, vec![1000000.0, 250.5, 12.3]);
    }

    #[test]
    fn test_tabs_and_crlf() {
        let stdout = " #bytes #iterations\r\n 65536\t1000\t\t9.87\r\n---\r\n";
        let result = PenultimateLineParser.parse(stdout).unwrap();
        assert_eq!(result.values, vec![65536.0, 1000.0, 9.87]);
    }

    #[test]
    fn test_scientific_notation() {
        let result = PenultimateLineParser.parse("1e3 2.5E-1\nend").unwrap();
        assert_eq!(result.values, vec![1000.0, 0.25]);
    }

    #[test]
    fn test_blank_data_line_is_empty_result() {
        let result = PenultimateLineParser.parse("header\n   \nfooter\n").unwrap();
        assert!(result.values.is_empty());
    }

    #[test]
    fn test_too_few_lines() {
        assert!(PenultimateLineParser.parse("").is_err());
        let err = PenultimateLineParser.parse("only one line\n").unwrap_err();
        assert_eq!(err.category(), "PARSE");
    }

    #[test]
    fn test_non_numeric_token() {
        let err = PenultimateLineParser
            .parse(" #bytes BW[MB/sec]\n-----\n")
            .unwrap_err();
        assert_eq!(err.category(), "PARSE");
        assert!(err.to_string().contains("#bytes"));
    }
}
