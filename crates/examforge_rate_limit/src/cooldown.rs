//! Quota cooldown guard.

use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// Tracks quota exhaustion for one provider.
///
/// After [`trip`](CooldownGuard::trip) is called, [`check_available`]
/// (CooldownGuard::check_available) returns false until the cooldown window
/// elapses. The reset is lazy: it happens on the next check, not via a
/// timer.
///
/// # Examples
///
/// ```
/// use examforge_rate_limit::CooldownGuard;
/// use std::time::Duration;
///
/// let mut guard = CooldownGuard::new(Duration::from_secs(45));
/// assert!(guard.check_available());
///
/// guard.trip();
/// assert!(!guard.check_available());
/// ```
#[derive(Debug, Clone)]
pub struct CooldownGuard {
    cooldown: Duration,
    exhausted: bool,
    reset_at: Option<Instant>,
}

impl CooldownGuard {
    /// Create a guard with the given cooldown window.
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            exhausted: false,
            reset_at: None,
        }
    }

    /// Check whether the provider may be invoked right now.
    ///
    /// Lazily clears the exhausted state once the window has elapsed.
    pub fn check_available(&mut self) -> bool {
        if !self.exhausted {
            return true;
        }

        match self.reset_at {
            Some(reset_at) if Instant::now() >= reset_at => {
                debug!("Cooldown window elapsed, provider available again");
                self.exhausted = false;
                self.reset_at = None;
                true
            }
            Some(_) => false,
            // Exhausted without a deadline should not happen; recover.
            None => {
                self.exhausted = false;
                true
            }
        }
    }

    /// Record a quota exhaustion signal, starting the cooldown window.
    pub fn trip(&mut self) {
        let reset_at = Instant::now() + self.cooldown;
        warn!(cooldown_secs = self.cooldown.as_secs(), "Quota exhausted, entering cooldown");
        self.exhausted = true;
        self.reset_at = Some(reset_at);
    }

    /// Time remaining in the cooldown window, if any.
    pub fn remaining(&self) -> Option<Duration> {
        if !self.exhausted {
            return None;
        }
        self.reset_at
            .map(|reset_at| reset_at.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn available_until_tripped() {
        let mut guard = CooldownGuard::new(Duration::from_secs(45));
        assert!(guard.check_available());
        guard.trip();
        assert!(!guard.check_available());
        assert!(guard.remaining().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn resets_lazily_after_window() {
        let mut guard = CooldownGuard::new(Duration::from_secs(45));
        guard.trip();

        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(!guard.check_available(), "still inside cooldown at t=10s");

        tokio::time::advance(Duration::from_secs(36)).await;
        assert!(guard.check_available(), "window elapsed at t=46s");
        assert!(guard.remaining().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn trip_again_restarts_window() {
        let mut guard = CooldownGuard::new(Duration::from_secs(45));
        guard.trip();
        tokio::time::advance(Duration::from_secs(46)).await;
        assert!(guard.check_available());

        guard.trip();
        assert!(!guard.check_available());
    }
}
