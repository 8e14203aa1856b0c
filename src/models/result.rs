//! Results of a single benchmark invocation

use serde::{Deserialize, Serialize};

/// Numbers scraped from one invocation's output, in the order they were printed
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunResult {
    pub values: Vec<f64>,
}

impl RunResult {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Space-joined rendering; integral values keep a trailing ".0"
    pub fn to_line(&self) -> String {
        self.values
            .iter()
            .map(|value| format_value(*value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<Vec<f64>> for RunResult {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl std::fmt::Display for RunResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_line())
    }
}

/// Shortest round-trip rendering of one value.
///
/// Integral values keep a trailing ".0". Decimal exponents below -4 or from
/// 16 upwards switch to scientific notation with a signed, at least two-digit
/// exponent (`1.2e-05`, `1e+16`).
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf".to_string() } else { "-inf".to_string() };
    }

    let scientific = format!("{:e}", value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => (scientific.as_str(), 0),
    };

    if value != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    let plain = format!("{}", value);
    if plain.contains('.') {
        plain
    } else {
        format!("{}.0", plain)
    }
}

/// How a single invocation ended, short of a fatal error
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// Client run succeeded and its output was parsed
    Measured(RunResult),
    /// Server run succeeded; server output carries no data
    Completed,
    /// The peer never accepted a connection within the retry budget
    ServerUnavailable { attempts: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_rendering() {
        let result = RunResult::new(vec![1_000_000.0, 250.5, 12.3]);
        assert_eq!(result.to_line(), "1000000.0 250.5 12.3");
        assert_eq!(result.to_string(), "1000000.0 250.5 12.3");
    }

    #[test]
    fn test_format_value_edge_cases() {
        assert_eq!(format_value(0.0), "0.0");
        assert_eq!(format_value(-3.0), "-3.0");
        assert_eq!(format_value(0.25), "0.25");
        assert_eq!(format_value(-0.0), "-0.0");
        assert_eq!(format_value(f64::INFINITY), "inf");
        assert_eq!(format_value(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_value(f64::NAN), "nan");
    }

    #[test]
    fn test_format_value_switches_to_scientific() {
        assert_eq!(format_value(0.0001), "0.0001");
        assert_eq!(format_value(0.000012), "1.2e-05");
        assert_eq!(format_value(-0.00005), "-5e-05");
        assert_eq!(format_value(1e15), "1000000000000000.0");
        assert_eq!(format_value(1e16), "1e+16");
        assert_eq!(format_value(1.5e20), "1.5e+20");
        assert_eq!(format_value(2.5e-300), "2.5e-300");
        assert_eq!(format_value(123456789.125), "123456789.125");
    }

    #[test]
    fn test_empty_result() {
        let result = RunResult::default();
        assert!(result.values.is_empty());
        assert_eq!(result.to_line(), "");
    }
}
