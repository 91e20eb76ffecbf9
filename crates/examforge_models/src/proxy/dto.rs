//! Data transfer objects for the generation proxy.

use base64::Engine;
use examforge_core::InlinePart;
use serde::{Deserialize, Serialize};

/// An inline binary blob in provider wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineBlob {
    /// MIME type, e.g. "image/png"
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    /// Base64-encoded data
    pub data: String,
}

/// One part of a multimodal payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContentPart {
    /// Inline binary data (image scans, etc.)
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineBlob,
    },
    /// Plain text
    Text { text: String },
}

/// The `contents` field: either a bare prompt string or a parts list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ContentPayload {
    /// Bare prompt string
    Text(String),
    /// Multimodal parts
    Parts { parts: Vec<ContentPart> },
}

/// Generation configuration forwarded to the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ProxyGenerationConfig {
    /// Strict structured-output mode, when set to "application/json"
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

/// Proxy generation request.
#[derive(
    Debug, Clone, PartialEq, Serialize, derive_builder::Builder, derive_getters::Getters,
)]
#[builder(setter(into))]
pub struct ProxyRequest {
    /// Model identifier
    model: String,
    /// Prompt payload
    contents: ContentPayload,
    /// Generation configuration
    #[builder(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<ProxyGenerationConfig>,
}

impl ProxyRequest {
    /// Creates a new proxy request.
    pub fn new(
        model: impl Into<String>,
        contents: ContentPayload,
        config: Option<ProxyGenerationConfig>,
    ) -> Self {
        Self {
            model: model.into(),
            contents,
            config,
        }
    }

    /// Creates a new builder for ProxyRequest.
    pub fn builder() -> ProxyRequestBuilder {
        ProxyRequestBuilder::default()
    }
}

/// Proxy response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyEnvelope {
    /// Whether the upstream call succeeded
    pub success: bool,
    /// Generated text, present on success
    #[serde(default)]
    pub data: Option<String>,
    /// Error message, present on failure
    #[serde(default)]
    pub error: Option<String>,
}

/// Encode raw bytes as an inline request part.
pub fn encode_inline(mime: impl Into<String>, bytes: &[u8]) -> InlinePart {
    InlinePart {
        mime: mime.into(),
        data: base64::engine::general_purpose::STANDARD.encode(bytes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_in_wire_format() {
        let request = ProxyRequest::new(
            "gemini-flash-lite-latest",
            ContentPayload::Parts {
                parts: vec![
                    ContentPart::Inline {
                        inline_data: InlineBlob {
                            mime_type: "image/png".to_string(),
                            data: "aGk=".to_string(),
                        },
                    },
                    ContentPart::Text {
                        text: "Extract the question".to_string(),
                    },
                ],
            },
            Some(ProxyGenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                temperature: Some(0.7),
            }),
        );

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gemini-flash-lite-latest");
        assert_eq!(json["contents"]["parts"][0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(json["config"]["responseMimeType"], "application/json");
    }

    #[test]
    fn bare_text_contents_serialize_as_string() {
        let request = ProxyRequest::new(
            "gemini-flash-lite-latest",
            ContentPayload::Text("hello".to_string()),
            None,
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"], "hello");
        assert!(json.get("config").is_none());
    }

    #[test]
    fn envelope_tolerates_missing_fields() {
        let envelope: ProxyEnvelope =
            serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert!(envelope.error.is_none());
    }

    #[test]
    fn encode_inline_base64s_the_bytes() {
        let part = encode_inline("image/png", b"hi");
        assert_eq!(part.data, "aGk=");
        assert_eq!(part.mime, "image/png");
    }
}
