//! Generation driver backed by the proxy.

use crate::proxy::{
    ContentPart, ContentPayload, InlineBlob, ProxyClient, ProxyGenerationConfig, ProxyRequest,
};
use async_trait::async_trait;
use examforge_core::{GenerationRequest, ResponseShape};
use examforge_error::ProviderError;
use examforge_interface::GenerationDriver;

/// Instruction appended to prompts for the deep-reasoning slot, which does
/// not honor strict structured-output mode.
const FENCED_BLOCK_INSTRUCTION: &str = "\n\nReturn the final result as a single fenced ```json code block containing only the JSON payload, with no other text inside the block.";

/// Driver for a proxy-served model slot.
///
/// The same client serves two slots with different structured-output
/// handling: the primary slot requests strict JSON mode, while the
/// deep-reasoning slot appends a fenced-block instruction instead.
#[derive(Debug, Clone)]
pub struct ProxyDriver {
    client: ProxyClient,
    model: String,
    name: String,
    deep_reasoning: bool,
}

impl ProxyDriver {
    /// Driver with strict structured-output mode.
    pub fn new(client: ProxyClient, model: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            name: name.into(),
            deep_reasoning: false,
        }
    }

    /// Driver for an extended-reasoning model: structured-output mode off,
    /// fenced-block instruction on.
    pub fn deep(client: ProxyClient, model: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            name: name.into(),
            deep_reasoning: true,
        }
    }

    /// The model this driver targets.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerationDriver for ProxyDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts_binary(&self) -> bool {
        true
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let mut prompt = request.prompt().clone();
        let mut config = ProxyGenerationConfig {
            response_mime_type: None,
            temperature: Some(*request.temperature()),
        };

        if *request.response_shape() == ResponseShape::Json {
            if self.deep_reasoning {
                prompt.push_str(FENCED_BLOCK_INSTRUCTION);
            } else {
                config.response_mime_type = Some("application/json".to_string());
            }
        }

        let contents = match request.inline() {
            Some(part) => ContentPayload::Parts {
                parts: vec![
                    ContentPart::Inline {
                        inline_data: InlineBlob {
                            mime_type: part.mime.clone(),
                            data: part.data.clone(),
                        },
                    },
                    ContentPart::Text { text: prompt },
                ],
            },
            None => ContentPayload::Text(prompt),
        };

        let proxy_request = ProxyRequest::new(self.model.clone(), contents, Some(config));
        self.client.generate(&proxy_request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deep_driver_is_flagged() {
        let client = ProxyClient::new("http://localhost:5000/api");
        let driver = ProxyDriver::deep(client, "gemini-2.5-pro", "deep_reasoning");
        assert!(driver.deep_reasoning);
        assert!(driver.accepts_binary());
        assert_eq!(driver.name(), "deep_reasoning");
    }
}
