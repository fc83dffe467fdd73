//! Knowledge base of curated error questions and their remediation answers.
//!
//! The matcher only sees [`KnowledgeRecord`]s. Where they come from is hidden
//! behind [`KnowledgeBaseLookup`]:
//!
//! - [`HttpKnowledgeBase`]: remote JSON endpoint queried per message
//! - [`StaticKnowledgeBase`]: answer set loaded from a local file

mod file;
mod http;
pub mod matcher;

pub use file::StaticKnowledgeBase;
pub use http::{HttpKnowledgeBase, HttpKnowledgeBaseBuilder};
pub use matcher::{best_match, ratio, similarity, MatchResult, DEFAULT_THRESHOLD};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Errors from knowledge-base lookups.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Knowledge base returned status {0}")]
    Status(u16),

    #[error("Malformed knowledge base response: {0}")]
    MalformedResponse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse answer set: {0}")]
    Parse(String),
}

/// One curated question/answer pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct KnowledgeRecord {
    /// The error text this entry answers. Answer sets exported from the
    /// support spreadsheet call this column `user`.
    pub question: String,
    /// Remediation shown to the user.
    pub answer: String,
}

/// Record as it appears on the wire. `user` wins when both keys are present.
#[derive(Deserialize)]
struct RawRecord {
    user: Option<String>,
    question: Option<String>,
    answer: String,
}

impl TryFrom<RawRecord> for KnowledgeRecord {
    type Error = String;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        let question = raw
            .user
            .or(raw.question)
            .ok_or_else(|| "missing field `user`".to_string())?;
        Ok(Self::new(question, raw.answer))
    }
}

impl KnowledgeRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Decode a list of records, skipping entries that lack a question or answer.
///
/// Returns an error only when `value` is not an array.
pub fn decode_records(value: serde_json::Value) -> Result<Vec<KnowledgeRecord>, LookupError> {
    let serde_json::Value::Array(items) = value else {
        return Err(LookupError::MalformedResponse(format!(
            "expected an array of records, got {}",
            json_kind(&value)
        )));
    };

    let total = items.len();
    let records: Vec<KnowledgeRecord> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(e) => {
                debug!("Skipping malformed knowledge record: {}", e);
                None
            }
        })
        .collect();

    if records.len() < total {
        debug!(
            "Decoded {} of {} knowledge records ({} skipped)",
            records.len(),
            total,
            total - records.len()
        );
    }
    Ok(records)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Source of candidate records for a message.
#[async_trait]
pub trait KnowledgeBaseLookup: Send + Sync {
    /// Short name for logs and health output.
    fn name(&self) -> &str;

    /// Fetch the records to match `text` against.
    async fn query(&self, text: &str) -> Result<Vec<KnowledgeRecord>, LookupError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_user_alias() {
        let records = decode_records(json!([
            {"user": "cannot access iqc webservice", "answer": "Restart the IQC service."},
            {"question": "printer offline", "answer": "Check the cable."}
        ]))
        .unwrap();
        assert_eq!(
            records,
            vec![
                KnowledgeRecord::new("cannot access iqc webservice", "Restart the IQC service."),
                KnowledgeRecord::new("printer offline", "Check the cable."),
            ]
        );
    }

    #[test]
    fn test_decode_prefers_user_over_question() {
        let records = decode_records(json!([
            {"user": "cannot access iqc webservice", "question": "ignored", "answer": "Restart."}
        ]))
        .unwrap();
        assert_eq!(
            records,
            vec![KnowledgeRecord::new("cannot access iqc webservice", "Restart.")]
        );
    }

    #[test]
    fn test_decode_skips_malformed() {
        let records = decode_records(json!([
            {"user": "missing answer"},
            {"answer": "missing question"},
            "not an object",
            {"user": 42, "answer": "wrong type"},
            {"user": "ok", "answer": "kept", "extra": true}
        ]))
        .unwrap();
        assert_eq!(records, vec![KnowledgeRecord::new("ok", "kept")]);
    }

    #[test]
    fn test_decode_rejects_non_array() {
        let err = decode_records(json!({"error": "quota exceeded"})).unwrap_err();
        assert!(matches!(err, LookupError::MalformedResponse(_)));
        assert!(err.to_string().contains("an object"));
    }

    #[test]
    fn test_decode_empty_array() {
        assert!(decode_records(json!([])).unwrap().is_empty());
    }
}
