//! Provider switcher.
//!
//! The orchestrator owns every registered provider's runtime state and
//! routes each request down a fixed fallback chain: the request's target
//! provider first, then the remaining slots in priority order. Providers
//! that cannot serve the request (missing, text-only against a binary
//! payload, or inside a quota cooldown) are skipped without being invoked.

use crate::config::{BatchSettings, OrchestratorConfig};
use crate::state::ProviderState;
use examforge_core::{GeneratedPayload, GenerationRequest, ProviderKind, ResponseShape};
use examforge_error::{OrchestratorError, OrchestratorErrorKind};
use examforge_interface::GenerationDriver;
use examforge_models::{parse_value, ChatClient, ProxyClient, ProxyDriver};
use examforge_rate_limit::{CooldownGuard, RateLimitConfig};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument, warn};

fn lock_guard(guard: &Mutex<CooldownGuard>) -> MutexGuard<'_, CooldownGuard> {
    match guard.lock() {
        Ok(inner) => inner,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Routes generation requests across providers with per-provider
/// serialization and quota cooldowns.
///
/// All provider state is owned here; there are no process-wide globals.
/// Cloning is cheap and every clone shares the same queues and guards.
///
/// # Examples
///
/// ```no_run
/// use examforge::{Orchestrator, OrchestratorConfig};
/// use examforge_core::GenerationRequest;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let orchestrator = Orchestrator::from_config(&OrchestratorConfig::load()?);
/// let payload = orchestrator
///     .generate(GenerationRequest::text("Explain photosynthesis briefly."))
///     .await?;
/// println!("{:?}", payload.as_text());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Orchestrator {
    providers: HashMap<ProviderKind, ProviderState>,
    default_provider: ProviderKind,
    batch: BatchSettings,
}

impl Orchestrator {
    /// Returns a builder for assembling an orchestrator driver by driver.
    pub fn builder() -> OrchestratorBuilder {
        OrchestratorBuilder::default()
    }

    /// Wire every configured provider slot.
    ///
    /// The fast cloud slot requires an API key from the environment; when
    /// the key is absent that slot is skipped with a warning rather than
    /// failing the whole setup.
    ///
    /// Must be called inside a tokio runtime, since each provider spawns a
    /// queue worker.
    pub fn from_config(config: &OrchestratorConfig) -> Self {
        let proxy = ProxyClient::new(config.proxy_base_url.clone());
        let mut builder = Self::builder()
            .preferred(config.preferred_provider)
            .batch(config.batch);

        let primary = config.provider(ProviderKind::Primary);
        builder = builder.with_driver(
            ProviderKind::Primary,
            Arc::new(ProxyDriver::new(proxy.clone(), primary.model.clone(), "primary")),
            primary.rate_limit,
        );

        let deep = config.provider(ProviderKind::DeepReasoning);
        builder = builder.with_driver(
            ProviderKind::DeepReasoning,
            Arc::new(ProxyDriver::deep(proxy, deep.model.clone(), "deep_reasoning")),
            deep.rate_limit,
        );

        let local = config.provider(ProviderKind::Local);
        builder = builder.with_driver(
            ProviderKind::Local,
            Arc::new(ChatClient::local(
                config.local_base_url.clone(),
                local.model.clone(),
                "local",
            )),
            local.rate_limit,
        );

        let secondary = config.provider(ProviderKind::Secondary);
        match ChatClient::from_env(
            config.fast_base_url.clone(),
            secondary.model.clone(),
            &config.fast_api_key_env,
            "secondary",
        ) {
            Ok(client) => {
                builder =
                    builder.with_driver(ProviderKind::Secondary, Arc::new(client), secondary.rate_limit);
            }
            Err(e) => {
                warn!(error = %e, "Fast cloud provider not registered");
            }
        }

        builder.build()
    }

    /// Provider tried first when a request does not name one.
    pub fn default_provider(&self) -> ProviderKind {
        self.default_provider
    }

    /// Progressive fetch settings shared with the batch helpers.
    pub fn batch_settings(&self) -> BatchSettings {
        self.batch
    }

    /// Route a request through the fallback chain and return the payload.
    ///
    /// The attempt order is the request's target provider followed by the
    /// fixed chain, without repeats. A provider in cooldown is skipped
    /// immediately; the orchestrator never waits out a cooldown window. A
    /// quota signal from an invocation trips that provider's guard before
    /// moving on. For [`ResponseShape::Json`] requests, output that cannot
    /// be coerced into JSON counts as a provider failure and the chain
    /// continues.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorErrorKind::AllProvidersFailed`] once the chain
    /// is exhausted, carrying the last failure observed.
    #[instrument(skip(self, request), fields(target = %request.target_provider()))]
    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<GeneratedPayload, OrchestratorError> {
        let mut attempts = 0usize;
        let mut last: Option<OrchestratorErrorKind> = None;

        for kind in attempt_order(*request.target_provider()) {
            let Some(state) = self.providers.get(&kind) else {
                continue;
            };

            if *request.requires_binary_input() && !state.driver.accepts_binary() {
                debug!(provider = %kind, "Skipping text-only provider for binary request");
                continue;
            }

            {
                let mut guard = lock_guard(&state.guard);
                if !guard.check_available() {
                    let retry_in_secs =
                        guard.remaining().map(|d| d.as_secs()).unwrap_or_default();
                    debug!(provider = %kind, retry_in_secs, "Skipping provider in cooldown");
                    last = Some(OrchestratorErrorKind::QuotaExhausted {
                        provider: kind.to_string(),
                        retry_in_secs,
                    });
                    continue;
                }
            }

            attempts += 1;
            let driver = Arc::clone(&state.driver);
            let call_request = request.clone();
            let outcome = state
                .queue
                .enqueue(move || async move { driver.generate(&call_request).await })
                .await
                .map_err(|e| OrchestratorErrorKind::Queue(e.to_string()))?;

            let text = match outcome {
                Ok(text) => text,
                Err(e) => {
                    if e.is_quota_signal() {
                        let retry_in_secs = {
                            let mut guard = lock_guard(&state.guard);
                            guard.trip();
                            guard.remaining().map(|d| d.as_secs()).unwrap_or_default()
                        };
                        warn!(provider = %kind, "Quota exhaustion signal, tripping cooldown");
                        last = Some(OrchestratorErrorKind::QuotaExhausted {
                            provider: kind.to_string(),
                            retry_in_secs,
                        });
                    } else {
                        warn!(provider = %kind, error = %e, "Provider failed, trying next");
                        last = Some(OrchestratorErrorKind::Provider(e));
                    }
                    continue;
                }
            };

            match request.response_shape() {
                ResponseShape::PlainText => {
                    info!(provider = %kind, attempts, "Request served");
                    return Ok(GeneratedPayload::Text(text));
                }
                ResponseShape::Json => match parse_value(&text) {
                    Ok(value) => {
                        info!(provider = %kind, attempts, "Request served");
                        return Ok(GeneratedPayload::Structured(value));
                    }
                    Err(e) => {
                        warn!(provider = %kind, error = %e, "Unparsable output, trying next");
                        last = Some(OrchestratorErrorKind::MalformedOutput(e.message));
                        continue;
                    }
                },
            }
        }

        Err(OrchestratorError::new(
            OrchestratorErrorKind::AllProvidersFailed {
                attempts,
                last: last
                    .map(|kind| kind.to_string())
                    .unwrap_or_else(|| "no eligible providers".to_string()),
            },
        ))
    }

    /// Convenience wrapper building a request from a bare prompt.
    ///
    /// # Errors
    ///
    /// Propagates [`generate`](Orchestrator::generate) failures.
    pub async fn generate_text(
        &self,
        prompt: impl Into<String>,
        wants_structured_output: bool,
        temperature: f32,
    ) -> Result<GeneratedPayload, OrchestratorError> {
        let shape = if wants_structured_output {
            ResponseShape::Json
        } else {
            ResponseShape::PlainText
        };
        let request = GenerationRequest::builder()
            .prompt(prompt.into())
            .response_shape(shape)
            .temperature(temperature)
            .target_provider(self.default_provider)
            .build()
            .map_err(|e| {
                OrchestratorError::new(OrchestratorErrorKind::InvalidRequest(e.to_string()))
            })?;
        self.generate(request).await
    }
}

/// Attempt order for a request: the target first, then the fixed chain,
/// without repeats.
fn attempt_order(target: ProviderKind) -> Vec<ProviderKind> {
    let mut order = vec![target];
    for kind in ProviderKind::fallback_chain() {
        if !order.contains(&kind) {
            order.push(kind);
        }
    }
    order
}

/// Builder assembling an [`Orchestrator`] driver by driver.
#[derive(Debug, Default)]
pub struct OrchestratorBuilder {
    providers: HashMap<ProviderKind, ProviderState>,
    default_provider: ProviderKind,
    batch: BatchSettings,
}

impl OrchestratorBuilder {
    /// Provider tried first when a request names none.
    pub fn preferred(mut self, kind: ProviderKind) -> Self {
        self.default_provider = kind;
        self
    }

    /// Progressive fetch settings.
    pub fn batch(mut self, batch: BatchSettings) -> Self {
        self.batch = batch;
        self
    }

    /// Register a driver for a provider slot, spawning its queue worker.
    ///
    /// Must be called inside a tokio runtime.
    pub fn with_driver(
        mut self,
        kind: ProviderKind,
        driver: Arc<dyn GenerationDriver>,
        rate_limit: RateLimitConfig,
    ) -> Self {
        debug!(provider = %kind, driver = driver.name(), "Registered provider");
        self.providers
            .insert(kind, ProviderState::new(driver, rate_limit));
        self
    }

    /// Finalize the orchestrator.
    pub fn build(self) -> Orchestrator {
        Orchestrator {
            providers: self.providers,
            default_provider: self.default_provider,
            batch: self.batch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_order_has_no_repeats() {
        let order = attempt_order(ProviderKind::Local);
        assert_eq!(order.len(), 4);
        assert_eq!(order[0], ProviderKind::Local);
    }

    #[test]
    fn default_target_leads_with_primary() {
        let order = attempt_order(ProviderKind::Primary);
        assert_eq!(
            order,
            vec![
                ProviderKind::Primary,
                ProviderKind::Secondary,
                ProviderKind::Local,
                ProviderKind::DeepReasoning,
            ]
        );
    }
}
