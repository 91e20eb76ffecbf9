//! Per-provider runtime state.

use examforge_interface::GenerationDriver;
use examforge_rate_limit::{CooldownGuard, RateLimitConfig, SerialQueue};
use std::sync::{Arc, Mutex};

/// Runtime state for one registered provider: its driver, its serialized
/// invocation queue, and its quota cooldown guard.
///
/// The guard lives behind a mutex that is never held across an await;
/// availability checks and trips are short synchronous sections.
#[derive(Clone)]
pub(crate) struct ProviderState {
    pub(crate) driver: Arc<dyn GenerationDriver>,
    pub(crate) queue: SerialQueue,
    pub(crate) guard: Arc<Mutex<CooldownGuard>>,
}

impl ProviderState {
    /// Wire a driver with its own queue and cooldown guard.
    pub(crate) fn new(driver: Arc<dyn GenerationDriver>, rate_limit: RateLimitConfig) -> Self {
        Self {
            driver,
            queue: SerialQueue::new(rate_limit.min_interval()),
            guard: Arc::new(Mutex::new(CooldownGuard::new(rate_limit.cooldown()))),
        }
    }
}

impl std::fmt::Debug for ProviderState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderState")
            .field("driver", &self.driver.name())
            .field("queue", &self.queue)
            .finish()
    }
}
