//! HTTP client for the generation proxy.

use crate::proxy::{ProxyEnvelope, ProxyRequest};
use examforge_error::{ProviderError, ProviderErrorKind};
use reqwest::Client;
use tracing::{debug, error, instrument};

/// Client for the server-side generation proxy.
#[derive(Debug, Clone)]
pub struct ProxyClient {
    http: Client,
    base_url: String,
}

impl ProxyClient {
    /// Creates a client for the proxy at `base_url` (e.g.
    /// `http://localhost:5000/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        debug!(url = %base_url, "Created proxy client");
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Performs one generation call through the proxy.
    ///
    /// # Errors
    ///
    /// Non-2xx statuses and `success: false` envelopes become
    /// [`ProviderErrorKind::Api`], which carries enough detail for quota
    /// classification upstream.
    #[instrument(skip(self, request), fields(model = %request.model()))]
    pub async fn generate(&self, request: &ProxyRequest) -> Result<String, ProviderError> {
        let url = format!("{}/ai/generate", self.base_url.trim_end_matches('/'));

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP request to proxy failed");
                ProviderError::new(ProviderErrorKind::Http(format!("request failed: {}", e)))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ProxyEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error)
                .unwrap_or(body);
            error!(status = status.as_u16(), message = %message, "Proxy returned error status");
            return Err(ProviderError::new(ProviderErrorKind::Api {
                status: status.as_u16(),
                message,
            }));
        }

        let envelope: ProxyEnvelope = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to decode proxy envelope");
            ProviderError::new(ProviderErrorKind::ResponseDecoding(e.to_string()))
        })?;

        if !envelope.success {
            let message = envelope
                .error
                .unwrap_or_else(|| "provider reported failure".to_string());
            return Err(ProviderError::new(ProviderErrorKind::Api {
                status: status.as_u16(),
                message,
            }));
        }

        debug!("Proxy call succeeded");
        envelope
            .data
            .filter(|data| !data.is_empty())
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::EmptyResponse))
    }
}
