//! Provider identifiers and the fallback chain.

use serde::{Deserialize, Serialize};

/// The interchangeable generation backends the orchestrator can route to.
///
/// Capabilities (binary input, structured output mode) belong to the driver
/// implementations; this enum only identifies a routing slot.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Default,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProviderKind {
    /// Base cloud provider, the guaranteed-available default.
    #[default]
    Primary,
    /// Specialized fast cloud provider.
    Secondary,
    /// Local/offline provider (text-only).
    Local,
    /// Cloud provider variant with extended reasoning.
    ///
    /// Drivers for this slot disable strict structured-output mode and
    /// instruct the model to emit a fenced code block instead.
    DeepReasoning,
}

impl ProviderKind {
    /// Fixed fallback priority order used when the preferred provider fails.
    pub fn fallback_chain() -> [ProviderKind; 4] {
        [
            ProviderKind::Secondary,
            ProviderKind::Local,
            ProviderKind::DeepReasoning,
            ProviderKind::Primary,
        ]
    }

    /// All provider kinds.
    pub fn all() -> [ProviderKind; 4] {
        [
            ProviderKind::Primary,
            ProviderKind::Secondary,
            ProviderKind::Local,
            ProviderKind::DeepReasoning,
        ]
    }
}
