use std::time::Duration;

use crate::config::ExtractorConfig;

/// Exponential backoff over a fixed attempt budget.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &ExtractorConfig) -> Self {
        RetryPolicy {
            max_attempts: config.max_attempts,
            initial_backoff: config.initial_backoff(),
            multiplier: config.backoff_multiplier,
        }
    }

    /// Pause owed before 1-based `attempt`; none before the first attempt or
    /// past the budget. Growth saturates at `Duration::MAX`.
    pub fn delay_before(&self, attempt: u32) -> Option<Duration> {
        if attempt < 2 || attempt > self.max_attempts {
            return None;
        }
        if self.initial_backoff.is_zero() {
            return Some(Duration::ZERO);
        }
        let exponent = i32::try_from(attempt - 2).unwrap_or(i32::MAX);
        let secs = self.initial_backoff.as_secs_f64() * self.multiplier.powi(exponent);
        Some(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
    }
}
