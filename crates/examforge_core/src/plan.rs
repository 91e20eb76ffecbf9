//! Practice session plans for progressive delivery.

use serde::{Deserialize, Serialize};

/// How many items a progressive session should deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchTarget {
    /// Deliver until the accumulated count reaches this total.
    Count(usize),
    /// No ceiling: keep fetching whenever the consumer nears the tail.
    Endless,
}

impl Default for FetchTarget {
    fn default() -> Self {
        FetchTarget::Count(10)
    }
}

/// Plan for one practice/generation session.
///
/// # Examples
///
/// ```
/// use examforge_core::{FetchTarget, PracticePlan};
///
/// let plan = PracticePlan::builder()
///     .exam("SSC CGL".to_string())
///     .subject("Quantitative Aptitude".to_string())
///     .target(FetchTarget::Count(20))
///     .build()
///     .unwrap();
///
/// assert_eq!(plan.batch_size(), &5);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct PracticePlan {
    /// Exam the questions target
    exam: String,
    /// Subject within the exam
    subject: String,
    /// Difficulty label passed through to the prompt
    #[builder(default = "\"Medium\".to_string()")]
    difficulty: String,
    /// Restrict generation to these topics (empty = whole subject)
    #[builder(default)]
    topics: Vec<String>,
    /// Total item target for the session
    #[builder(default)]
    target: FetchTarget,
    /// Items requested per provider call
    #[builder(default = "5")]
    batch_size: usize,
}

impl PracticePlan {
    /// Returns a builder for constructing a PracticePlan.
    pub fn builder() -> PracticePlanBuilder {
        PracticePlanBuilder::default()
    }
}
