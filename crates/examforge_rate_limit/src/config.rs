//! Rate limit configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

fn default_min_interval_ms() -> u64 {
    2000
}

fn default_cooldown_secs() -> u64 {
    45
}

/// Per-provider rate limit settings.
///
/// `min_interval_ms` spaces consecutive invocation starts on one provider's
/// queue; `cooldown_secs` is how long a provider is skipped after a quota
/// exhaustion signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Minimum milliseconds between invocation starts
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    /// Cooldown window after quota exhaustion, in seconds
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval_ms(),
            cooldown_secs: default_cooldown_secs(),
        }
    }
}

impl RateLimitConfig {
    /// Settings for a provider without spacing requirements.
    pub fn unlimited() -> Self {
        Self {
            min_interval_ms: 0,
            cooldown_secs: default_cooldown_secs(),
        }
    }

    /// Minimum inter-call interval as a [`Duration`].
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// Cooldown window as a [`Duration`].
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }
}
