use std::time::Duration;

/// Timeout and retry budget applied to every capability boundary call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallPolicy {
    /// Budget for a single attempt.
    pub timeout: Duration,
    /// Additional attempts after the first failure.
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for CallPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            max_retries: 2,
            base_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl CallPolicy {
    /// Delay before the retry following failed attempt `attempt` (0-based),
    /// doubling from the base up to the configured cap.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(16);
        let multiplier = 1_u64 << exponent;
        let delay_ms = (self.base_delay.as_millis() as u64)
            .saturating_mul(multiplier)
            .min(self.max_delay.as_millis() as u64);
        Duration::from_millis(delay_ms)
    }
}
