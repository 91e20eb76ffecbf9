//! Generic client for any OpenAI-compatible chat API.

use crate::openai_compat::{ChatMessage, ChatRequest, ChatResponse, ResponseFormat};
use async_trait::async_trait;
use examforge_core::{GenerationRequest, ResponseShape};
use examforge_error::{ProviderError, ProviderErrorKind};
use examforge_interface::GenerationDriver;
use reqwest::Client;
use tracing::{debug, error, instrument};

/// Client for an OpenAI-compatible chat endpoint.
///
/// With an API key this is the fast cloud provider; without one it is the
/// local/offline server. Both slots are text-only.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    provider_name: String,
}

impl ChatClient {
    /// Client authenticated with an API key.
    pub fn with_api_key(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: impl Into<String>,
        provider_name: impl Into<String>,
    ) -> Self {
        Self::build(base_url, model, Some(api_key.into()), provider_name)
    }

    /// Client for a local server that needs no authentication.
    pub fn local(
        base_url: impl Into<String>,
        model: impl Into<String>,
        provider_name: impl Into<String>,
    ) -> Self {
        Self::build(base_url, model, None, provider_name)
    }

    /// Client authenticated from an environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderErrorKind::MissingApiKey`] when the variable is
    /// unset or empty.
    pub fn from_env(
        base_url: impl Into<String>,
        model: impl Into<String>,
        env_var: &str,
        provider_name: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let provider_name = provider_name.into();
        match std::env::var(env_var) {
            Ok(key) if !key.trim().is_empty() => {
                Ok(Self::build(base_url, model, Some(key), provider_name))
            }
            _ => Err(ProviderError::new(ProviderErrorKind::MissingApiKey(
                provider_name,
            ))),
        }
    }

    fn build(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        provider_name: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into();
        let model = model.into();
        let provider_name = provider_name.into();
        debug!(provider = %provider_name, model = %model, url = %base_url, "Created chat client");
        Self {
            http: Client::new(),
            api_key,
            base_url,
            model,
            provider_name,
        }
    }

    /// The model this client targets.
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl GenerationDriver for ChatClient {
    fn name(&self) -> &str {
        &self.provider_name
    }

    #[instrument(skip(self, request), fields(provider = %self.provider_name, model = %self.model))]
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let mut prompt = request.prompt().clone();
        let response_format = match request.response_shape() {
            ResponseShape::Json => {
                // JSON mode requires the prompt itself to mention JSON.
                prompt.push_str("\n\nRespond with a JSON payload only.");
                Some(ResponseFormat::json_object())
            }
            ResponseShape::PlainText => None,
        };

        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(prompt)],
            temperature: Some(*request.temperature()),
            response_format,
        };

        let mut http_request = self.http.post(&self.base_url).json(&body);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key);
        }

        let response = http_request.send().await.map_err(|e| {
            error!(provider = %self.provider_name, error = %e, "HTTP request failed");
            if e.is_connect() {
                ProviderError::new(ProviderErrorKind::Offline(e.to_string()))
            } else {
                ProviderError::new(ProviderErrorKind::Http(format!("request failed: {}", e)))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(
                provider = %self.provider_name,
                status = status.as_u16(),
                message = %message,
                "API error"
            );
            return Err(ProviderError::new(ProviderErrorKind::Api {
                status: status.as_u16(),
                message,
            }));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = %self.provider_name, error = %e, "Failed to parse response");
            ProviderError::new(ProviderErrorKind::ResponseDecoding(e.to_string()))
        })?;

        debug!(
            provider = %self.provider_name,
            choices = chat_response.choices.len(),
            "Received response"
        );

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyResponse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_without_key_is_an_error() {
        let result = ChatClient::from_env(
            "https://api.groq.com/openai/v1/chat/completions",
            "llama-3.3-70b-versatile",
            "EXAMFORGE_TEST_UNSET_KEY",
            "secondary",
        );
        assert!(matches!(
            result.unwrap_err().kind,
            ProviderErrorKind::MissingApiKey(_)
        ));
    }

    #[test]
    fn local_client_is_text_only() {
        let client = ChatClient::local(
            "http://localhost:11434/v1/chat/completions",
            "llama3",
            "local",
        );
        assert!(!client.accepts_binary());
    }
}
