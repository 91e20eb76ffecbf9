//! Generation driver trait.

use async_trait::async_trait;
use examforge_core::GenerationRequest;
use examforge_error::ProviderError;

/// An interchangeable generation backend.
///
/// Drivers perform the actual network call and return the provider's raw
/// text output; sanitization and parsing happen above this seam. Drivers
/// are invoked through a per-provider serial queue, so implementations do
/// not need their own request spacing.
#[async_trait]
pub trait GenerationDriver: Send + Sync {
    /// Provider name for logging and error messages.
    fn name(&self) -> &str;

    /// Whether this backend can accept inline binary input.
    ///
    /// Text-only backends are skipped for requests that carry the
    /// `requires_binary_input` flag, regardless of preference.
    fn accepts_binary(&self) -> bool {
        false
    }

    /// Perform one generation call, returning the raw response text.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError>;
}
