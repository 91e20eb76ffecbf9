//! Mock-paper models.
//!
//! A paper is assembled from one MCQ section (generated in batches through
//! the orchestrator) plus optional non-MCQ sections generated in a single
//! skeleton call.

use crate::Question;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Requested composition of a mock paper.
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
pub struct PaperBlueprint {
    /// Exam the paper targets
    exam: String,
    /// Subject within the exam
    subject: String,
    /// Difficulty label
    #[builder(default = "\"Medium\".to_string()")]
    difficulty: String,
    /// Free-form syllabus/context seed injected into prompts
    #[builder(default)]
    seed_data: String,
    /// Include an MCQ section
    #[builder(default = "true")]
    include_mcq: bool,
    /// Include a short-answer section
    #[builder(default)]
    include_short: bool,
    /// Include a long-answer section
    #[builder(default)]
    include_long: bool,
    /// Include a viva section
    #[builder(default)]
    include_viva: bool,
    /// Total MCQs to generate
    #[builder(default = "10")]
    mcq_count: usize,
}

impl PaperBlueprint {
    /// Returns a builder for constructing a PaperBlueprint.
    pub fn builder() -> PaperBlueprintBuilder {
        PaperBlueprintBuilder::default()
    }
}

/// A titled section of a generated paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperSection {
    /// Section identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Marks per question in this section
    pub marks_per_question: u32,
    /// Questions in this section
    pub questions: Vec<Question>,
}

impl PaperSection {
    /// Total marks carried by this section.
    pub fn total_marks(&self) -> u32 {
        self.questions.len() as u32 * self.marks_per_question
    }
}

/// A fully assembled mock paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionPaper {
    /// Paper identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Exam the paper targets
    pub exam: String,
    /// Subject within the exam
    pub subject: String,
    /// Difficulty label
    pub difficulty: String,
    /// Total marks across all sections
    pub total_marks: u32,
    /// Suggested duration
    pub duration_minutes: u32,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Paper sections in display order
    pub sections: Vec<PaperSection>,
}
