//! Provider-level error types and quota classification.

/// Provider-specific error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// API key not configured for a provider that requires one
    MissingApiKey(String),
    /// HTTP/transport failure before a status code was available
    Http(String),
    /// The provider endpoint returned an error status or error envelope
    Api {
        /// HTTP status code
        status: u16,
        /// Error message from the provider
        message: String,
    },
    /// The provider reported success but the envelope carried no payload
    EmptyResponse,
    /// The provider response body could not be decoded
    ResponseDecoding(String),
    /// Local/offline backend is not reachable
    Offline(String),
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderErrorKind::MissingApiKey(provider) => {
                write!(f, "API key not configured for provider: {}", provider)
            }
            ProviderErrorKind::Http(msg) => write!(f, "HTTP request failed: {}", msg),
            ProviderErrorKind::Api { status, message } => {
                write!(f, "Provider returned status {}: {}", status, message)
            }
            ProviderErrorKind::EmptyResponse => {
                write!(f, "Provider envelope carried no payload")
            }
            ProviderErrorKind::ResponseDecoding(msg) => {
                write!(f, "Failed to decode provider response: {}", msg)
            }
            ProviderErrorKind::Offline(msg) => {
                write!(f, "Local backend unreachable: {}", msg)
            }
        }
    }
}

impl ProviderErrorKind {
    /// Check whether this error is a quota/rate exhaustion signal.
    ///
    /// Covers HTTP 429/503 plus provider-specific exhaustion phrases that
    /// some backends return with a generic status.
    pub fn is_quota_signal(&self) -> bool {
        match self {
            ProviderErrorKind::Api { status, message } => {
                if matches!(*status, 429 | 503) {
                    return true;
                }
                let lower = message.to_lowercase();
                lower.contains("resource_exhausted")
                    || lower.contains("resource exhausted")
                    || lower.contains("quota")
                    || lower.contains("rate limit")
            }
            _ => false,
        }
    }
}

/// Provider error with source location tracking.
///
/// # Examples
///
/// ```
/// use examforge_error::{ProviderError, ProviderErrorKind};
///
/// let err = ProviderError::new(ProviderErrorKind::Api {
///     status: 429,
///     message: "Quota exceeded (429)".to_string(),
/// });
/// assert!(err.is_quota_signal());
/// ```
#[derive(Debug, Clone)]
pub struct ProviderError {
    /// The kind of error that occurred
    pub kind: ProviderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Check whether this error is a quota/rate exhaustion signal.
    pub fn is_quota_signal(&self) -> bool {
        self.kind.is_quota_signal()
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Provider Error: {} at line {} in {}",
            self.kind, self.line, self.file
        )
    }
}

impl std::error::Error for ProviderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_signal_matches_429_and_503() {
        for status in [429u16, 503] {
            let kind = ProviderErrorKind::Api {
                status,
                message: String::new(),
            };
            assert!(kind.is_quota_signal(), "status {} should be quota", status);
        }
        let kind = ProviderErrorKind::Api {
            status: 500,
            message: "internal".to_string(),
        };
        assert!(!kind.is_quota_signal());
    }

    #[test]
    fn quota_signal_matches_exhaustion_phrases() {
        let kind = ProviderErrorKind::Api {
            status: 400,
            message: "RESOURCE_EXHAUSTED: try again later".to_string(),
        };
        assert!(kind.is_quota_signal());

        let kind = ProviderErrorKind::Http("connection reset".to_string());
        assert!(!kind.is_quota_signal());
    }
}
