//! Orchestrator error types.
//!
//! These are the only errors that cross the facade boundary. Lower layers
//! throw [`ProviderError`](crate::ProviderError) and
//! [`ParseError`](crate::ParseError); the switcher catches those and
//! reclassifies them into the kinds below.

use crate::{ParseError, ProviderError, StoreError};

/// Error kinds surfaced by the request orchestrator.
#[derive(Debug, Clone, derive_more::Display)]
pub enum OrchestratorErrorKind {
    /// A provider is inside its cooldown window.
    #[display("Provider '{provider}' is in quota cooldown for {retry_in_secs}s")]
    QuotaExhausted {
        /// Provider that signalled exhaustion
        provider: String,
        /// Seconds until the cooldown window ends
        retry_in_secs: u64,
    },

    /// A provider response could not be coerced into structured data.
    #[display("Malformed provider output: {_0}")]
    MalformedOutput(String),

    /// Every provider in the fallback chain failed or was skipped.
    #[display("All providers failed after {attempts} attempt(s), last error: {last}")]
    AllProvidersFailed {
        /// Number of providers actually invoked
        attempts: usize,
        /// Display of the last error observed
        last: String,
    },

    /// The request could not be constructed.
    #[display("Invalid request: {_0}")]
    InvalidRequest(String),

    /// A provider call failed.
    #[display("Provider failure: {_0}")]
    Provider(ProviderError),

    /// The serial queue worker is gone.
    #[display("Queue failure: {_0}")]
    Queue(String),

    /// The approved-content store failed.
    #[display("Content store failure: {_0}")]
    Store(String),
}

impl From<ProviderError> for OrchestratorErrorKind {
    fn from(err: ProviderError) -> Self {
        OrchestratorErrorKind::Provider(err)
    }
}

impl From<ParseError> for OrchestratorErrorKind {
    fn from(err: ParseError) -> Self {
        OrchestratorErrorKind::MalformedOutput(err.message)
    }
}

impl From<StoreError> for OrchestratorErrorKind {
    fn from(err: StoreError) -> Self {
        OrchestratorErrorKind::Store(err.message)
    }
}

/// Orchestrator error with source location tracking.
#[derive(Debug, Clone, derive_more::Display)]
#[display("Orchestrator Error: {} at line {} in {}", kind, line, file)]
pub struct OrchestratorError {
    kind: OrchestratorErrorKind,
    line: u32,
    file: &'static str,
}

impl OrchestratorError {
    /// Create a new orchestrator error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: OrchestratorErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &OrchestratorErrorKind {
        &self.kind
    }

    /// True when every provider in the chain was exhausted or failed.
    pub fn is_exhaustion(&self) -> bool {
        matches!(self.kind, OrchestratorErrorKind::AllProvidersFailed { .. })
    }
}

impl std::error::Error for OrchestratorError {}

impl<T> From<T> for OrchestratorError
where
    T: Into<OrchestratorErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}
