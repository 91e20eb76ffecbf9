//! Mock-paper assembly.
//!
//! A paper has one MCQ section generated in parallel batches plus optional
//! non-MCQ sections from a single skeleton call. MCQs whose correct option
//! cannot be resolved are dropped rather than shipped unanswerable.

use crate::Orchestrator;
use chrono::Utc;
use examforge_core::{
    GeneratedPayload, GenerationRequest, PaperBlueprint, PaperSection, Question, QuestionKind,
    QuestionPaper, QuestionSource, ResponseShape, ResultBatch,
};
use examforge_error::{OrchestratorError, OrchestratorErrorKind, ParseError};
use examforge_models::{parse_paper_skeleton, parse_questions, questions_from_value, PaperSkeleton, RawNonMcq};
use std::collections::HashSet;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// MCQs requested per provider call when filling the MCQ section.
const MCQ_BATCH_SIZE: usize = 30;

/// Non-MCQ section layout: (kind tag for the prompt, count, marks each).
const SHORT_LAYOUT: (&str, usize, u32) = ("short_answer", 5, 3);
const LONG_LAYOUT: (&str, usize, u32) = ("long_answer", 3, 10);
const VIVA_LAYOUT: (&str, usize, u32) = ("viva", 5, 2);

/// Minutes budgeted per question when computing the paper duration.
const MCQ_MINUTES: u32 = 1;
const SHORT_MINUTES: u32 = 5;
const LONG_MINUTES: u32 = 15;

fn mcq_prompt(blueprint: &PaperBlueprint, count: usize) -> String {
    let seed = if blueprint.seed_data().is_empty() {
        String::new()
    } else {
        format!("\n\nUse this syllabus context:\n{}", blueprint.seed_data())
    };

    format!(
        "You are setting a mock paper for the {exam} examination, subject \
         \"{subject}\", at {difficulty} difficulty.\n\
         Generate exactly {count} multiple-choice questions.{seed}\n\n\
         Return ONLY a JSON array. Each element must have:\n\
         - \"text\": the question text\n\
         - \"options\": an array of exactly 4 answer options\n\
         - \"answer\": the exact text of the correct option\n\
         - \"explanation\": a concise explanation",
        exam = blueprint.exam(),
        subject = blueprint.subject(),
        difficulty = blueprint.difficulty(),
        count = count,
        seed = seed,
    )
}

fn skeleton_prompt(blueprint: &PaperBlueprint) -> String {
    let mut requested = Vec::new();
    if *blueprint.include_short() {
        let (tag, count, marks) = SHORT_LAYOUT;
        requested.push(format!(
            "- {count} short-answer questions worth {marks} marks each (type \"{tag}\")"
        ));
    }
    if *blueprint.include_long() {
        let (tag, count, marks) = LONG_LAYOUT;
        requested.push(format!(
            "- {count} long-answer questions worth {marks} marks each (type \"{tag}\")"
        ));
    }
    if *blueprint.include_viva() {
        let (tag, count, marks) = VIVA_LAYOUT;
        requested.push(format!(
            "- {count} viva questions worth {marks} marks each (type \"{tag}\")"
        ));
    }

    format!(
        "You are setting a mock paper for the {exam} examination, subject \
         \"{subject}\", at {difficulty} difficulty.\n\
         Generate the written sections:\n{requested}\n\n\
         Return ONLY a JSON object of the form:\n\
         {{\"meta\": {{\"total_marks\": <number>, \"time_mins\": <number>}},\n\
          \"non_mcq_questions\": [{{\"q_no\": <number>, \"type\": <type tag>, \
         \"q_text\": <question>, \"answer\": <model answer>, \"marks\": <number>}}]}}",
        exam = blueprint.exam(),
        subject = blueprint.subject(),
        difficulty = blueprint.difficulty().to_lowercase(),
        requested = requested.join("\n"),
    )
}

/// Map a skeleton type tag to a question kind, tolerating case and
/// separator variations.
fn kind_from_tag(tag: &str) -> Option<QuestionKind> {
    let tag = tag.to_lowercase();
    if tag.contains("short") {
        Some(QuestionKind::ShortAnswer)
    } else if tag.contains("long") {
        Some(QuestionKind::LongAnswer)
    } else if tag.contains("viva") {
        Some(QuestionKind::Viva)
    } else {
        None
    }
}

fn question_from_raw(
    raw: RawNonMcq,
    kind: QuestionKind,
    default_marks: u32,
    blueprint: &PaperBlueprint,
) -> Question {
    Question {
        id: format!("p-{}", Uuid::new_v4()),
        text: raw.q_text,
        options: Vec::new(),
        correct_index: None,
        answer: raw.answer,
        explanation: String::new(),
        tags: Vec::new(),
        exam: Some(blueprint.exam().clone()),
        subject: Some(blueprint.subject().clone()),
        kind,
        source: QuestionSource::Generated,
        marks: Some(raw.marks.unwrap_or(default_marks)),
        created_at: Utc::now(),
    }
}

impl Orchestrator {
    async fn paper_mcq_batch(
        &self,
        blueprint: &PaperBlueprint,
        count: usize,
    ) -> Result<ResultBatch, OrchestratorError> {
        let request = GenerationRequest::builder()
            .prompt(mcq_prompt(blueprint, count))
            .response_shape(ResponseShape::Json)
            .target_provider(self.default_provider())
            .build()
            .map_err(|e| {
                OrchestratorError::new(OrchestratorErrorKind::InvalidRequest(e.to_string()))
            })?;

        let payload = self.generate(request).await?;
        let questions = match payload {
            GeneratedPayload::Structured(value) => {
                questions_from_value(&value, blueprint.exam(), blueprint.subject())?
            }
            GeneratedPayload::Text(text) => {
                parse_questions(&text, blueprint.exam(), blueprint.subject())?
            }
        };
        Ok(questions.into())
    }

    async fn paper_skeleton(
        &self,
        blueprint: &PaperBlueprint,
    ) -> Result<PaperSkeleton, OrchestratorError> {
        let request = GenerationRequest::builder()
            .prompt(skeleton_prompt(blueprint))
            .response_shape(ResponseShape::Json)
            .target_provider(self.default_provider())
            .build()
            .map_err(|e| {
                OrchestratorError::new(OrchestratorErrorKind::InvalidRequest(e.to_string()))
            })?;

        let payload = self.generate(request).await?;
        let skeleton = match payload {
            GeneratedPayload::Structured(value) => serde_json::from_value(value)
                .map_err(|e| ParseError::new(format!("invalid paper skeleton: {}", e)))?,
            GeneratedPayload::Text(text) => parse_paper_skeleton(&text)?,
        };
        Ok(skeleton)
    }

    /// Generate a complete mock paper from a blueprint.
    ///
    /// The MCQ section is filled in parallel batches of up to 30
    /// questions; per-provider queues still serialize the actual
    /// invocations. A failed MCQ batch shortens the section
    /// with a warning instead of failing the paper. Non-MCQ sections come
    /// from one skeleton call; when MCQs were produced, a skeleton failure
    /// also only shortens the paper.
    ///
    /// Totals are computed from the assembled sections, falling back to
    /// the skeleton's metadata and then to 100 marks / 60 minutes.
    ///
    /// # Errors
    ///
    /// Fails only when no section could be produced at all.
    #[instrument(skip(self, blueprint), fields(exam = %blueprint.exam(), subject = %blueprint.subject()))]
    pub async fn generate_full_paper(
        &self,
        blueprint: &PaperBlueprint,
    ) -> Result<QuestionPaper, OrchestratorError> {
        let mut sections: Vec<PaperSection> = Vec::new();

        if *blueprint.include_mcq() && *blueprint.mcq_count() > 0 {
            let mut counts = Vec::new();
            let mut remaining = *blueprint.mcq_count();
            while remaining > 0 {
                let take = remaining.min(MCQ_BATCH_SIZE);
                counts.push(take);
                remaining -= take;
            }

            let pending = counts.into_iter().map(|count| self.paper_mcq_batch(blueprint, count));
            let results = futures_util::future::join_all(pending).await;

            let mut seen: HashSet<String> = HashSet::new();
            let mut mcqs: Vec<Question> = Vec::new();
            let mut unresolved = 0usize;
            for result in results {
                match result {
                    Ok(batch) => {
                        for question in batch {
                            if question.correct_index.is_none() {
                                unresolved += 1;
                                continue;
                            }
                            if seen.insert(question.id.clone()) {
                                mcqs.push(question);
                            }
                        }
                    }
                    Err(e) => warn!(error = %e, "MCQ batch failed, section will be short"),
                }
            }
            if unresolved > 0 {
                warn!(unresolved, "Dropped MCQs without a resolvable correct option");
            }
            mcqs.truncate(*blueprint.mcq_count());

            if !mcqs.is_empty() {
                sections.push(PaperSection {
                    id: Uuid::new_v4().to_string(),
                    title: "Section A: Multiple Choice".to_string(),
                    marks_per_question: 1,
                    questions: mcqs,
                });
            }
        }

        let wants_non_mcq =
            *blueprint.include_short() || *blueprint.include_long() || *blueprint.include_viva();
        let mut meta_total = None;
        let mut meta_minutes = None;

        if wants_non_mcq {
            match self.paper_skeleton(blueprint).await {
                Ok(skeleton) => {
                    if let Some(meta) = &skeleton.meta {
                        meta_total = meta.total_marks;
                        meta_minutes = meta.time_mins;
                    }
                    sections.extend(non_mcq_sections(skeleton, blueprint));
                }
                Err(e) if sections.is_empty() => return Err(e),
                Err(e) => warn!(error = %e, "Skeleton failed, paper has MCQs only"),
            }
        }

        if sections.is_empty() {
            return Err(OrchestratorError::new(
                OrchestratorErrorKind::MalformedOutput(
                    "no usable sections could be generated".to_string(),
                ),
            ));
        }

        let mut total_marks: u32 = sections.iter().map(PaperSection::total_marks).sum();
        if total_marks == 0 {
            total_marks = meta_total.unwrap_or(100);
        }

        let mut duration_minutes: u32 = sections
            .iter()
            .map(|section| {
                let count = section.questions.len() as u32;
                match section.questions.first().map(|q| q.kind) {
                    Some(QuestionKind::Mcq) => count * MCQ_MINUTES,
                    Some(QuestionKind::ShortAnswer) => count * SHORT_MINUTES,
                    Some(QuestionKind::LongAnswer) => count * LONG_MINUTES,
                    _ => 0,
                }
            })
            .sum();
        if duration_minutes == 0 {
            duration_minutes = meta_minutes.unwrap_or(60);
        }

        let paper = QuestionPaper {
            id: Uuid::new_v4().to_string(),
            title: format!("{} {} Mock Paper", blueprint.exam(), blueprint.subject()),
            exam: blueprint.exam().clone(),
            subject: blueprint.subject().clone(),
            difficulty: blueprint.difficulty().clone(),
            total_marks,
            duration_minutes,
            created_at: Utc::now(),
            sections,
        };
        info!(
            sections = paper.sections.len(),
            total_marks = paper.total_marks,
            duration_minutes = paper.duration_minutes,
            "Paper assembled"
        );
        Ok(paper)
    }
}

/// Distribute skeleton questions into the requested non-MCQ sections.
fn non_mcq_sections(skeleton: PaperSkeleton, blueprint: &PaperBlueprint) -> Vec<PaperSection> {
    let mut short = Vec::new();
    let mut long = Vec::new();
    let mut viva = Vec::new();

    for raw in skeleton.non_mcq_questions {
        if raw.q_text.trim().is_empty() {
            continue;
        }
        match kind_from_tag(&raw.kind) {
            Some(QuestionKind::ShortAnswer) => {
                short.push(question_from_raw(raw, QuestionKind::ShortAnswer, SHORT_LAYOUT.2, blueprint));
            }
            Some(QuestionKind::LongAnswer) => {
                long.push(question_from_raw(raw, QuestionKind::LongAnswer, LONG_LAYOUT.2, blueprint));
            }
            Some(QuestionKind::Viva) => {
                viva.push(question_from_raw(raw, QuestionKind::Viva, VIVA_LAYOUT.2, blueprint));
            }
            _ => warn!(tag = %raw.kind, "Skipping question with unknown type tag"),
        }
    }

    let mut sections = Vec::new();
    if *blueprint.include_short() && !short.is_empty() {
        sections.push(PaperSection {
            id: Uuid::new_v4().to_string(),
            title: "Section B: Short Answer".to_string(),
            marks_per_question: SHORT_LAYOUT.2,
            questions: short,
        });
    }
    if *blueprint.include_long() && !long.is_empty() {
        sections.push(PaperSection {
            id: Uuid::new_v4().to_string(),
            title: "Section C: Long Answer".to_string(),
            marks_per_question: LONG_LAYOUT.2,
            questions: long,
        });
    }
    if *blueprint.include_viva() && !viva.is_empty() {
        sections.push(PaperSection {
            id: Uuid::new_v4().to_string(),
            title: "Section D: Viva".to_string(),
            marks_per_question: VIVA_LAYOUT.2,
            questions: viva,
        });
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_tags_map_to_kinds() {
        assert_eq!(kind_from_tag("short_answer"), Some(QuestionKind::ShortAnswer));
        assert_eq!(kind_from_tag("ShortAnswer"), Some(QuestionKind::ShortAnswer));
        assert_eq!(kind_from_tag("LONG_ANSWER"), Some(QuestionKind::LongAnswer));
        assert_eq!(kind_from_tag("viva"), Some(QuestionKind::Viva));
        assert_eq!(kind_from_tag("essay"), None);
    }

    #[test]
    fn skeleton_prompt_lists_only_requested_sections() {
        let blueprint = PaperBlueprint::builder()
            .exam("CBSE XII".to_string())
            .subject("Physics".to_string())
            .include_short(true)
            .build()
            .unwrap();
        let prompt = skeleton_prompt(&blueprint);
        assert!(prompt.contains("short-answer"));
        assert!(!prompt.contains("long-answer"));
        assert!(!prompt.contains("viva"));
    }
}
