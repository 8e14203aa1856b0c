//! Retry with exponential backoff for transient benchmark failures
//!
//! The only failure perftest recovers from is a refused connection while the
//! server side is still starting. The policy here decides how long to wait
//! before each retry and when to give up; the actual waiting goes through the
//! [`Sleeper`] trait so the schedule can be observed without real delays.

use crate::defaults;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

/// Exponential backoff schedule: `initial_delay * multiplier^k` before retry `k`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffPolicy {
    /// Maximum number of retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after every retry
    pub multiplier: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_retries: defaults::DEFAULT_MAX_RETRIES,
            initial_delay: defaults::DEFAULT_INITIAL_BACKOFF,
            multiplier: defaults::BACKOFF_MULTIPLIER,
        }
    }
}

impl BackoffPolicy {
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries,
            initial_delay,
            ..Self::default()
        }
    }

    /// Delay to wait before retry number `retry` (zero-based), or `None`
    /// once the retry budget is spent
    pub fn delay_for(&self, retry: u32) -> Option<Duration> {
        if retry >= self.max_retries {
            return None;
        }
        let factor = self.multiplier.powi(retry as i32);
        let nanos = self.initial_delay.as_nanos() as f64 * factor;
        Some(Duration::from_nanos(nanos.round() as u64))
    }

    /// The full delay schedule
    pub fn delays(&self) -> Vec<Duration> {
        (0..self.max_retries).filter_map(|retry| self.delay_for(retry)).collect()
    }

    /// Worst-case time spent sleeping before giving up
    pub fn total_delay(&self) -> Duration {
        self.delays().into_iter().sum()
    }
}

/// Something that can pause the driver between retries
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        sleep(duration).await;
    }
}
