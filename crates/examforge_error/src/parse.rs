//! Parse error for response sanitization.

/// Error raised when a provider response cannot be coerced into
/// structured data.
///
/// The orchestrator treats this the same as a provider failure: it logs a
/// warning and falls back to the next provider in the chain.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// What failed to parse
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ParseError {
    /// Create a new ParseError with the given message at the current location.
    ///
    /// # Examples
    ///
    /// ```
    /// use examforge_error::ParseError;
    ///
    /// let err = ParseError::new("no JSON payload found");
    /// assert!(err.message.contains("payload"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Parse Error: {} at line {} in {}",
            self.message, self.line, self.file
        )
    }
}

impl std::error::Error for ParseError {}
