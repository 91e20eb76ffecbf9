//! Error types for the Examforge generation orchestration library.
//!
//! Each layer has a dedicated error type following the same pattern: a kind
//! enum describing what went wrong, wrapped in a struct that captures the
//! source location via `#[track_caller]`. Lower layers surface distinguished
//! kinds (quota signals, malformed output) so the orchestrator can reclassify
//! rather than retry blindly.

mod config;
mod orchestrator;
mod parse;
mod provider;
mod store;

pub use config::ConfigError;
pub use orchestrator::{OrchestratorError, OrchestratorErrorKind};
pub use parse::ParseError;
pub use provider::{ProviderError, ProviderErrorKind};
pub use store::StoreError;
