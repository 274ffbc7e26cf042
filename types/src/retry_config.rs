use core::time::Duration;

use serde::{Deserialize, Serialize};

/// Exponential backoff applied to transient upstream failures
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Delay before the first retry
    /// Supports human-readable format: "100ms", "1s", etc.
    #[serde(with = "humantime_serde", default = "default_initial_delay")]
    pub initial_delay: Duration,

    /// Upper bound on the delay between two attempts
    #[serde(with = "humantime_serde", default = "default_max_delay")]
    pub max_delay: Duration,

    /// Retrying stops once this much time has passed since the first attempt
    #[serde(with = "humantime_serde", default = "default_max_elapsed_time")]
    pub max_elapsed_time: Duration,

    /// Exponential backoff multiplier (e.g., 2.0 for doubling)
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

fn default_initial_delay() -> Duration {
    Duration::from_millis(100)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(2)
}

fn default_max_elapsed_time() -> Duration {
    Duration::from_secs(10)
}

fn default_multiplier() -> f64 {
    2.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            max_elapsed_time: default_max_elapsed_time(),
            multiplier: default_multiplier(),
        }
    }
}

impl RetryConfig {
    /// A configuration that never retries.
    pub fn disabled() -> Self {
        Self {
            max_elapsed_time: Duration::ZERO,
            ..Self::default()
        }
    }

    /// Calculate the next retry delay using exponential backoff
    pub fn next_delay(&self, current_delay: Duration) -> Duration {
        let next = current_delay.mul_f64(self.multiplier);
        core::cmp::min(next, self.max_delay)
    }
}
