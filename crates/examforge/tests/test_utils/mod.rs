#![allow(dead_code)]
//! Shared scripted mocks for the facade tests.

use async_trait::async_trait;
use chrono::Utc;
use examforge::{ContentStore, GenerationDriver, Question, QuestionKind, QuestionSource};
use examforge_core::GenerationRequest;
use examforge_error::{ProviderError, ProviderErrorKind, StoreError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Driver that replays a script of outcomes and counts its invocations.
///
/// When the script runs dry it answers with an empty JSON array. An
/// optional gate makes every call wait for a [`Notify`] permit, which lets
/// tests interleave other work while a call is in flight.
pub struct MockDriver {
    name: String,
    accepts_binary: bool,
    outcomes: Mutex<VecDeque<Result<String, ProviderErrorKind>>>,
    calls: AtomicUsize,
    gate: Option<Arc<Notify>>,
}

impl MockDriver {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            accepts_binary: false,
            outcomes: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            gate: None,
        }
    }

    pub fn binary(name: &str) -> Self {
        Self {
            accepts_binary: true,
            ..Self::new(name)
        }
    }

    pub fn gated(name: &str, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(name)
        }
    }

    pub fn push_ok(&self, text: impl Into<String>) {
        self.outcomes.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn push_err(&self, kind: ProviderErrorKind) {
        self.outcomes.lock().unwrap().push_back(Err(kind));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GenerationDriver for MockDriver {
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts_binary(&self) -> bool {
        self.accepts_binary
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("[]".to_string()));
        outcome.map_err(ProviderError::new)
    }
}

/// Store serving a fixed list of approved questions, or failing on demand.
pub struct MockStore {
    questions: Vec<Question>,
    fail: bool,
}

impl MockStore {
    pub fn with(questions: Vec<Question>) -> Self {
        Self {
            questions,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            questions: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl ContentStore for MockStore {
    async fn fetch_approved(
        &self,
        _exam: &str,
        _subject: &str,
        count: usize,
    ) -> Result<Vec<Question>, StoreError> {
        if self.fail {
            return Err(StoreError::new("store offline"));
        }
        Ok(self.questions.iter().take(count).cloned().collect())
    }
}

/// A pre-vetted question with a fixed id.
pub fn approved_question(id: &str, text: &str) -> Question {
    Question {
        id: id.to_string(),
        text: text.to_string(),
        options: Vec::new(),
        correct_index: None,
        answer: None,
        explanation: String::new(),
        tags: Vec::new(),
        exam: Some("SSC CGL".to_string()),
        subject: Some("General Awareness".to_string()),
        kind: QuestionKind::Mcq,
        source: QuestionSource::Approved,
        marks: None,
        created_at: Utc::now(),
    }
}

/// A JSON array of well-formed MCQs with the given question texts.
///
/// Ids are derived from the text downstream, so repeating a text across
/// batches produces a duplicate item.
pub fn mcq_array_json(texts: &[&str]) -> String {
    let elements: Vec<serde_json::Value> = texts
        .iter()
        .map(|text| {
            serde_json::json!({
                "text": text,
                "options": ["a", "b", "c", "d"],
                "correctIndex": 0,
                "explanation": "because",
                "tags": ["t"]
            })
        })
        .collect();
    serde_json::Value::Array(elements).to_string()
}

/// The quota exhaustion signal providers send when out of quota.
pub fn quota_error() -> ProviderErrorKind {
    ProviderErrorKind::Api {
        status: 429,
        message: "quota exceeded".to_string(),
    }
}
