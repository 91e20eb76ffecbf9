//! Core data types for the Examforge generation orchestration library.
//!
//! This crate provides the foundation data types used across all Examforge
//! layers: provider identifiers, generation requests, generated question
//! items, result batches, and paper/practice models.

mod observability;
mod paper;
mod payload;
mod plan;
mod provider;
mod question;
mod request;

pub use observability::init_tracing;
pub use paper::{PaperBlueprint, PaperBlueprintBuilder, PaperSection, QuestionPaper};
pub use payload::GeneratedPayload;
pub use plan::{FetchTarget, PracticePlan, PracticePlanBuilder};
pub use provider::ProviderKind;
pub use question::{Question, QuestionKind, QuestionSource, ResultBatch};
pub use request::{
    GenerationRequest, GenerationRequestBuilder, InlinePart, ResponseShape,
};
