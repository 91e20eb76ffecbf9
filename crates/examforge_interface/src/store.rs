//! Approved-content store trait.

use async_trait::async_trait;
use examforge_core::Question;
use examforge_error::StoreError;

/// Source of pre-vetted ("approved") questions.
///
/// Callers prefer approved content over freshly generated content; the
/// orchestrator only supplies the shortfall.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Fetch up to `count` approved questions for the given exam/subject.
    async fn fetch_approved(
        &self,
        exam: &str,
        subject: &str,
        count: usize,
    ) -> Result<Vec<Question>, StoreError>;
}
