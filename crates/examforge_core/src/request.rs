//! Generation request types.

use crate::ProviderKind;
use serde::{Deserialize, Serialize};

/// Expected shape of a provider response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// Free-form text.
    #[default]
    PlainText,
    /// Structured JSON payload.
    Json,
}

/// An inline binary part of a request payload (image scans, etc.),
/// carried as base64.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlinePart {
    /// MIME type, e.g. "image/png"
    pub mime: String,
    /// Base64-encoded data
    pub data: String,
}

/// A generation request routed through the orchestrator.
///
/// Immutable once enqueued. Whether the request needs a binary-capable
/// provider is an explicit flag set by the caller; the orchestrator never
/// inspects the payload to infer routing.
///
/// # Examples
///
/// ```
/// use examforge_core::{GenerationRequest, ProviderKind, ResponseShape};
///
/// let request = GenerationRequest::builder()
///     .prompt("Generate 5 questions".to_string())
///     .response_shape(ResponseShape::Json)
///     .target_provider(ProviderKind::Secondary)
///     .build()
///     .unwrap();
///
/// assert_eq!(*request.target_provider(), ProviderKind::Secondary);
/// assert!(!request.requires_binary_input());
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct GenerationRequest {
    /// The prompt text
    prompt: String,
    /// Optional inline binary payload
    #[builder(default)]
    inline: Option<InlinePart>,
    /// Expected response shape
    #[builder(default)]
    response_shape: ResponseShape,
    /// Sampling temperature
    #[builder(default = "0.7")]
    temperature: f32,
    /// Preferred provider for this request
    #[builder(default)]
    target_provider: ProviderKind,
    /// Whether the request can only be served by a binary-capable provider
    #[builder(default)]
    requires_binary_input: bool,
}

impl GenerationRequest {
    /// Returns a builder for constructing a GenerationRequest.
    pub fn builder() -> GenerationRequestBuilder {
        GenerationRequestBuilder::default()
    }

    /// Convenience constructor for a plain text request with defaults.
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            inline: None,
            response_shape: ResponseShape::PlainText,
            temperature: 0.7,
            target_provider: ProviderKind::default(),
            requires_binary_input: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_applies_defaults() {
        let request = GenerationRequest::builder()
            .prompt("hello")
            .build()
            .unwrap();
        assert_eq!(*request.response_shape(), ResponseShape::PlainText);
        assert_eq!(*request.target_provider(), ProviderKind::Primary);
        assert!(request.inline().is_none());
    }
}
