//! Practice question batches and practice sets.
//!
//! A practice set prefers pre-vetted content from the approved store and
//! asks providers only for the shortfall. Generated batches come back as
//! structured JSON and are normalized by the shared parsing layer.

use crate::Orchestrator;
use examforge_core::{
    FetchTarget, GeneratedPayload, GenerationRequest, PracticePlan, Question, ResponseShape,
    ResultBatch,
};
use examforge_error::{OrchestratorError, OrchestratorErrorKind};
use examforge_interface::ContentStore;
use examforge_models::{parse_questions, questions_from_value};
use std::collections::HashSet;
use tracing::{info, instrument, warn};

/// Prompt asking for a batch of multiple-choice practice questions.
fn practice_prompt(plan: &PracticePlan, count: usize) -> String {
    let topics = if plan.topics().is_empty() {
        String::new()
    } else {
        format!(", focusing on: {}", plan.topics().join(", "))
    };

    format!(
        "You are an expert question setter for the {exam} examination.\n\
         Generate exactly {count} multiple-choice questions for the subject \
         \"{subject}\"{topics} at {difficulty} difficulty.\n\n\
         Return ONLY a JSON array. Each element must have:\n\
         - \"text\": the question text\n\
         - \"options\": an array of exactly 4 answer options\n\
         - \"correctIndex\": the 0-based index of the correct option\n\
         - \"explanation\": a concise explanation of the correct answer\n\
         - \"tags\": an array of short topic tags",
        exam = plan.exam(),
        count = count,
        subject = plan.subject(),
        topics = topics,
        difficulty = plan.difficulty(),
    )
}

impl Orchestrator {
    /// Generate one batch of practice questions for a plan.
    ///
    /// Items carry content-derived ids, so callers can deduplicate across
    /// batches.
    ///
    /// # Errors
    ///
    /// Propagates [`generate`](Orchestrator::generate) failures; a payload
    /// that parses as JSON but matches no accepted question shape is
    /// [`OrchestratorErrorKind::MalformedOutput`].
    #[instrument(skip(self, plan), fields(exam = %plan.exam(), subject = %plan.subject()))]
    pub async fn generate_question_batch(
        &self,
        plan: &PracticePlan,
        count: usize,
    ) -> Result<ResultBatch, OrchestratorError> {
        let request = GenerationRequest::builder()
            .prompt(practice_prompt(plan, count))
            .response_shape(ResponseShape::Json)
            .target_provider(self.default_provider())
            .build()
            .map_err(|e| {
                OrchestratorError::new(OrchestratorErrorKind::InvalidRequest(e.to_string()))
            })?;

        let payload = self.generate(request).await?;
        let questions = match payload {
            GeneratedPayload::Structured(value) => {
                questions_from_value(&value, plan.exam(), plan.subject())?
            }
            GeneratedPayload::Text(text) => {
                parse_questions(&text, plan.exam(), plan.subject())?
            }
        };
        info!(requested = count, received = questions.len(), "Generated question batch");
        Ok(ResultBatch::new(questions))
    }

    /// Assemble a complete practice set, preferring approved content.
    ///
    /// Approved items are fetched first; providers supply only the
    /// shortfall, in batches, with deduplication against everything
    /// already collected. A store failure downgrades to full generation
    /// with a warning. A batch that adds nothing new ends the set early.
    ///
    /// # Errors
    ///
    /// Propagates generation failures for the shortfall batches.
    #[instrument(skip(self, store, plan), fields(exam = %plan.exam(), subject = %plan.subject()))]
    pub async fn generate_practice_set(
        &self,
        store: &dyn ContentStore,
        plan: &PracticePlan,
    ) -> Result<Vec<Question>, OrchestratorError> {
        let total = match plan.target() {
            FetchTarget::Count(total) => *total,
            FetchTarget::Endless => *plan.batch_size(),
        };

        let mut items: Vec<Question> = Vec::with_capacity(total);
        let mut seen: HashSet<String> = HashSet::new();

        match store.fetch_approved(plan.exam(), plan.subject(), total).await {
            Ok(approved) => {
                for question in approved.into_iter().take(total) {
                    if seen.insert(question.id.clone()) {
                        items.push(question);
                    }
                }
                info!(approved = items.len(), "Loaded approved content");
            }
            Err(e) => {
                warn!(error = %e, "Approved store unavailable, generating the full set");
            }
        }

        while items.len() < total {
            let ask = (total - items.len()).min(*plan.batch_size());
            let batch = self.generate_question_batch(plan, ask).await?;

            let mut added = 0;
            for question in batch {
                if seen.insert(question.id.clone()) {
                    items.push(question);
                    added += 1;
                }
            }
            if added == 0 {
                warn!(collected = items.len(), "Batch added no new items, stopping early");
                break;
            }

            if items.len() < total {
                tokio::time::sleep(self.batch_settings().backoff()).await;
            }
        }

        info!(delivered = items.len(), requested = total, "Practice set assembled");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_exam_subject_and_count() {
        let plan = PracticePlan::builder()
            .exam("SSC CGL".to_string())
            .subject("Quantitative Aptitude".to_string())
            .topics(vec!["Percentages".to_string()])
            .build()
            .unwrap();
        let prompt = practice_prompt(&plan, 7);
        assert!(prompt.contains("SSC CGL"));
        assert!(prompt.contains("Quantitative Aptitude"));
        assert!(prompt.contains("exactly 7"));
        assert!(prompt.contains("Percentages"));
        assert!(prompt.contains("correctIndex"));
    }
}
