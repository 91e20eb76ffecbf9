//! Generated question items and result batches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of a generated question.
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
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuestionKind {
    /// Multiple-choice question.
    #[default]
    Mcq,
    /// Short written answer.
    ShortAnswer,
    /// Long/detailed written answer.
    LongAnswer,
    /// Oral examination question.
    Viva,
}

/// Where a question came from.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuestionSource {
    /// Freshly generated by a provider.
    #[default]
    Generated,
    /// Pre-vetted content from the approved store.
    Approved,
}

/// A single generated question item.
///
/// The `id` is the deduplication key for progressive delivery: two items
/// with the same id are the same question, and merging keeps only the
/// first occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique identifier (stable for identical question text)
    pub id: String,
    /// The question text
    pub text: String,
    /// Answer options (empty for non-MCQ kinds)
    #[serde(default)]
    pub options: Vec<String>,
    /// Zero-based index of the correct option, when resolvable
    #[serde(default)]
    pub correct_index: Option<u32>,
    /// Model answer for non-MCQ kinds
    #[serde(default)]
    pub answer: Option<String>,
    /// Concise reasoning for the correct answer
    #[serde(default)]
    pub explanation: String,
    /// Topic tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Exam this question targets
    #[serde(default)]
    pub exam: Option<String>,
    /// Subject within the exam
    #[serde(default)]
    pub subject: Option<String>,
    /// Question kind
    #[serde(default)]
    pub kind: QuestionKind,
    /// Question source
    #[serde(default)]
    pub source: QuestionSource,
    /// Marks awarded for a correct answer
    #[serde(default)]
    pub marks: Option<u32>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Ordered sequence of questions produced by one provider invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ResultBatch {
    /// Items in generation order
    pub items: Vec<Question>,
}

impl ResultBatch {
    /// Wrap a sequence of questions as a batch.
    pub fn new(items: Vec<Question>) -> Self {
        Self { items }
    }

    /// Number of items in this batch.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when the batch carries no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<Question>> for ResultBatch {
    fn from(items: Vec<Question>) -> Self {
        Self::new(items)
    }
}

impl IntoIterator for ResultBatch {
    type Item = Question;
    type IntoIter = std::vec::IntoIter<Question>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
