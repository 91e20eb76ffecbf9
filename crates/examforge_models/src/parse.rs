//! Response sanitization and parsing.
//!
//! Generative output is rarely clean JSON: it may wrap the payload in
//! prose, fence it as markdown, or truncate trailing noise. The functions
//! here extract the most plausible JSON span, parse it, and normalize the
//! result into [`Question`] items, coercing missing optional fields to
//! safe defaults rather than discarding an otherwise-usable batch.

use chrono::Utc;
use examforge_core::{Question, QuestionKind, QuestionSource};
use examforge_error::ParseError;
use serde::Deserialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::warn;

/// Extract the inner content of a fenced code block labeled `json`.
///
/// This is the most reliable path for extended-reasoning providers, which
/// are instructed to emit their payload this way.
fn extract_fenced(text: &str) -> Option<&str> {
    let open = text.find("```json")?;
    let body = &text[open + "```json".len()..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}

/// Strip fence markers and slice the string down to the outermost JSON
/// span, deciding between array and object by whichever opener comes
/// first.
fn slice_payload(text: &str) -> String {
    let clean = text.replace("```json", "").replace("```", "");
    let clean = clean.trim();

    let first_square = clean.find('[');
    let first_curly = clean.find('{');

    let span = match (first_square, first_curly) {
        (Some(sq), Some(cu)) if sq < cu => clean.rfind(']').map(|end| (sq, end)),
        (Some(sq), None) => clean.rfind(']').map(|end| (sq, end)),
        (_, Some(cu)) => clean.rfind('}').map(|end| (cu, end)),
        (None, None) => None,
    };

    match span {
        Some((start, end)) if end > start => clean[start..=end].to_string(),
        _ => clean.to_string(),
    }
}

/// Reduce a raw response to its best JSON candidate.
pub fn sanitize(text: &str) -> String {
    match extract_fenced(text) {
        Some(inner) => inner.to_string(),
        None => slice_payload(text),
    }
}

/// Parse a raw response into a JSON value.
///
/// # Errors
///
/// Returns [`ParseError`] when no parsable JSON payload can be located;
/// the orchestrator treats this the same as a provider failure.
pub fn parse_value(text: &str) -> Result<Value, ParseError> {
    let candidate = sanitize(text);
    serde_json::from_str(&candidate)
        .map_err(|e| ParseError::new(format!("invalid JSON payload: {}", e)))
}

/// Stable identifier derived from the question text.
///
/// Providers do not return ids, so identity is content-based: the same
/// question text always maps to the same id, which is what makes
/// cross-batch deduplication possible.
fn stable_id(text: &str) -> String {
    let digest = Sha256::digest(text.trim().to_lowercase().as_bytes());
    let hex = format!("{:x}", digest);
    format!("q-{}", &hex[..16])
}

/// Question shape as providers emit it, before normalization.
#[derive(Debug, Clone, Deserialize, Default)]
struct RawQuestion {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, alias = "q_text")]
    text: String,
    #[serde(default)]
    options: Vec<String>,
    #[serde(default, alias = "correctIndex")]
    correct_index: Option<i64>,
    #[serde(default)]
    answer: Option<String>,
    #[serde(default)]
    explanation: String,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    marks: Option<u32>,
}

impl RawQuestion {
    /// Resolve the correct option index, either from an explicit index or
    /// by matching the answer text against the option list (paper batches
    /// carry the answer as option text).
    fn resolve_correct_index(&self) -> Option<u32> {
        if let Some(index) = self.correct_index {
            if index >= 0 && (index as usize) < self.options.len() {
                return Some(index as u32);
            }
            return None;
        }

        let answer = self.answer.as_deref()?;
        self.options
            .iter()
            .position(|option| option == answer || option.starts_with(answer))
            .map(|index| index as u32)
    }

    fn into_question(self, exam: &str, subject: &str) -> Question {
        let correct_index = self.resolve_correct_index();
        let id = self
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| stable_id(&self.text));

        Question {
            id,
            text: self.text,
            options: self.options,
            correct_index,
            answer: self.answer,
            explanation: self.explanation,
            tags: self.tags,
            exam: Some(exam.to_string()),
            subject: Some(subject.to_string()),
            kind: QuestionKind::Mcq,
            source: QuestionSource::Generated,
            marks: self.marks,
            created_at: Utc::now(),
        }
    }
}

/// Normalize an already-parsed JSON value into question items.
///
/// Accepts a bare array, an object wrapping the array under a `questions`
/// key, or a single question object. Elements that cannot be coerced are
/// skipped with a warning; an element without question text is dropped.
///
/// # Errors
///
/// Returns [`ParseError`] when the value has none of the accepted shapes.
pub fn questions_from_value(
    value: &Value,
    exam: &str,
    subject: &str,
) -> Result<Vec<Question>, ParseError> {
    let elements: Vec<Value> = match value {
        Value::Array(items) => items.clone(),
        Value::Object(map) => match map.get("questions") {
            Some(Value::Array(items)) => items.clone(),
            _ if map.contains_key("text") || map.contains_key("q_text") => {
                vec![value.clone()]
            }
            _ => {
                return Err(ParseError::new(
                    "expected an array, a {questions: [...]} wrapper, or a single question object",
                ));
            }
        },
        _ => return Err(ParseError::new("payload is not an array or object")),
    };

    let mut questions = Vec::with_capacity(elements.len());
    for element in elements {
        let raw: RawQuestion = match serde_json::from_value(element) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "Skipping malformed question element");
                continue;
            }
        };
        if raw.text.trim().is_empty() {
            continue;
        }
        questions.push(raw.into_question(exam, subject));
    }

    Ok(questions)
}

/// Parse a raw response into normalized question items.
pub fn parse_questions(text: &str, exam: &str, subject: &str) -> Result<Vec<Question>, ParseError> {
    let value = parse_value(text)?;
    questions_from_value(&value, exam, subject)
}

/// Skeleton of a mock paper: meta plus the non-MCQ questions, generated in
/// a single call.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PaperSkeleton {
    /// Paper-level metadata (used only as a fallback for totals)
    #[serde(default)]
    pub meta: Option<PaperMeta>,
    /// Non-MCQ questions across all requested sections
    #[serde(default)]
    pub non_mcq_questions: Vec<RawNonMcq>,
}

/// Paper-level metadata from the skeleton call.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PaperMeta {
    #[serde(default)]
    pub total_marks: Option<u32>,
    #[serde(default)]
    pub time_mins: Option<u32>,
}

/// A non-MCQ question as the skeleton call emits it.
#[derive(Debug, Clone, Deserialize)]
pub struct RawNonMcq {
    #[serde(default)]
    pub q_no: Option<u32>,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub q_text: String,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub marks: Option<u32>,
}

/// Parse a skeleton response.
///
/// # Errors
///
/// Returns [`ParseError`] when the payload cannot be parsed at all; a
/// skeleton without non-MCQ questions is valid.
pub fn parse_paper_skeleton(text: &str) -> Result<PaperSkeleton, ParseError> {
    let value = parse_value(text)?;
    serde_json::from_value(value)
        .map_err(|e| ParseError::new(format!("invalid paper skeleton: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_fenced_json_block() {
        let text = "Here is your result:\n```json\n[{\"text\": \"Q1\", \"options\": [\"a\", \"b\"], \"correctIndex\": 1}]\n```\nHope that helps!";
        let questions = parse_questions(text, "SSC", "GK").unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_index, Some(1));
    }

    #[test]
    fn slices_prose_wrapped_array() {
        let text = "Sure! [{\"text\": \"Q1\", \"options\": [], \"explanation\": \"e\"}] done";
        let questions = parse_questions(text, "SSC", "GK").unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].text, "Q1");
    }

    #[test]
    fn accepts_wrapper_object() {
        let text = r#"{"questions": [{"text": "Q1"}, {"text": "Q2"}]}"#;
        let questions = parse_questions(text, "SSC", "GK").unwrap();
        assert_eq!(questions.len(), 2);
    }

    #[test]
    fn accepts_single_question_object() {
        let text = r#"{"text": "Only one", "options": ["x", "y"], "correctIndex": 0}"#;
        let questions = parse_questions(text, "SSC", "GK").unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_index, Some(0));
    }

    #[test]
    fn coerces_missing_fields() {
        let text = r#"[{"text": "Q1"}]"#;
        let questions = parse_questions(text, "SSC", "GK").unwrap();
        let q = &questions[0];
        assert!(q.options.is_empty());
        assert_eq!(q.correct_index, None);
        assert_eq!(q.explanation, "");
        assert!(q.tags.is_empty());
    }

    #[test]
    fn out_of_range_index_becomes_none() {
        let text = r#"[{"text": "Q1", "options": ["a", "b"], "correctIndex": 7}]"#;
        let questions = parse_questions(text, "SSC", "GK").unwrap();
        assert_eq!(questions[0].correct_index, None);
    }

    #[test]
    fn resolves_answer_text_against_options() {
        let text = r#"[{"q_text": "Q1", "options": ["Alpha", "Beta"], "answer": "Beta"}]"#;
        let questions = parse_questions(text, "SSC", "GK").unwrap();
        assert_eq!(questions[0].correct_index, Some(1));
    }

    #[test]
    fn identical_text_yields_identical_id() {
        let a = parse_questions(r#"[{"text": "Same question?"}]"#, "SSC", "GK").unwrap();
        let b = parse_questions(r#"[{"text": "  same QUESTION?  "}]"#, "SSC", "GK").unwrap();
        assert_eq!(a[0].id, b[0].id);

        let c = parse_questions(r#"[{"text": "Different question?"}]"#, "SSC", "GK").unwrap();
        assert_ne!(a[0].id, c[0].id);
    }

    #[test]
    fn garbage_is_a_parse_error() {
        assert!(parse_questions("no json here at all", "SSC", "GK").is_err());
        assert!(parse_questions("", "SSC", "GK").is_err());
    }

    #[test]
    fn textless_elements_are_dropped() {
        let text = r#"[{"text": "Q1"}, {"explanation": "orphan"}]"#;
        let questions = parse_questions(text, "SSC", "GK").unwrap();
        assert_eq!(questions.len(), 1);
    }

    #[test]
    fn parses_paper_skeleton() {
        let text = r#"{
            "meta": {"total_marks": 50, "time_mins": 90},
            "non_mcq_questions": [
                {"q_no": 1, "type": "ShortAnswer", "q_text": "Define X", "answer": "...", "marks": 3}
            ]
        }"#;
        let skeleton = parse_paper_skeleton(text).unwrap();
        assert_eq!(skeleton.non_mcq_questions.len(), 1);
        assert_eq!(skeleton.meta.unwrap().total_marks, Some(50));
    }

    #[test]
    fn skeleton_without_sections_is_valid() {
        let skeleton = parse_paper_skeleton("{}").unwrap();
        assert!(skeleton.non_mcq_questions.is_empty());
    }
}
