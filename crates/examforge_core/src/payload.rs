//! Output payload from a generation call.

use serde::{Deserialize, Serialize};

/// The sanitized result of a generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum GeneratedPayload {
    /// Plain text output.
    Text(String),
    /// Structured JSON output, already sanitized and parsed.
    Structured(serde_json::Value),
}

impl GeneratedPayload {
    /// The structured value, if this payload is structured.
    pub fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            GeneratedPayload::Structured(value) => Some(value),
            GeneratedPayload::Text(_) => None,
        }
    }

    /// The raw text, if this payload is plain text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            GeneratedPayload::Text(text) => Some(text),
            GeneratedPayload::Structured(_) => None,
        }
    }
}
