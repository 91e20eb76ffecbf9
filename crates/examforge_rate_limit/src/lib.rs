//! Serialized invocation and quota cooldown for the Examforge orchestrator.
//!
//! Two pieces enforce a provider's sustainable request rate:
//!
//! - [`SerialQueue`]: a FIFO task queue with a dedicated worker loop that
//!   spaces consecutive invocation starts by a minimum interval. One queue
//!   per provider; different providers' queues are fully independent.
//! - [`CooldownGuard`]: after a provider signals quota exhaustion, all
//!   requests to it fail fast (no network call) until a cooldown window
//!   elapses.

mod config;
mod cooldown;
mod error;
mod queue;

pub use config::RateLimitConfig;
pub use cooldown::CooldownGuard;
pub use error::{RateLimitError, RateLimitErrorKind};
pub use queue::SerialQueue;
