//! Request orchestration for AI-generated exam content.
//!
//! This facade crate ties the workspace together:
//!
//! - [`Orchestrator`] routes generation requests across providers with
//!   per-provider serialized queues, quota cooldowns, and a fixed fallback
//!   chain.
//! - [`ProgressiveFetcher`] accumulates question items batch by batch so a
//!   session becomes usable before it is complete.
//! - Practice-set and mock-paper assembly live on [`Orchestrator`] as
//!   higher-level operations.
//!
//! # Examples
//!
//! ```no_run
//! use examforge::{Orchestrator, OrchestratorConfig};
//! use examforge_core::{FetchTarget, PracticePlan};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! examforge_core::init_tracing();
//! let orchestrator = Orchestrator::from_config(&OrchestratorConfig::load()?);
//!
//! let plan = PracticePlan::builder()
//!     .exam("SSC CGL".to_string())
//!     .subject("General Awareness".to_string())
//!     .target(FetchTarget::Count(10))
//!     .build()?;
//! let batch = orchestrator.generate_question_batch(&plan, 5).await?;
//! println!("received {} questions", batch.len());
//! # Ok(())
//! # }
//! ```

mod config;
mod fetcher;
mod orchestrator;
mod paper;
mod practice;
mod state;

pub use config::{BatchSettings, OrchestratorConfig, ProviderSettings, ProvidersConfig};
pub use fetcher::{ProgressiveFetcher, SessionId};
pub use orchestrator::{Orchestrator, OrchestratorBuilder};

pub use examforge_core::{
    init_tracing, FetchTarget, GeneratedPayload, GenerationRequest, InlinePart, PaperBlueprint,
    PaperSection, PracticePlan, ProviderKind, Question, QuestionKind, QuestionPaper,
    QuestionSource, ResponseShape, ResultBatch,
};
pub use examforge_error::{OrchestratorError, OrchestratorErrorKind};
pub use examforge_interface::{ContentStore, GenerationDriver};
pub use examforge_rate_limit::{CooldownGuard, RateLimitConfig, SerialQueue};
