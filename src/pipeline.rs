//! Resolution of raw OCR text to a curated answer.

use serde::Serialize;
use tracing::{info, warn};

use crate::extract::ErrorMessageExtractor;
use crate::knowledge::{best_match, KnowledgeBaseLookup, DEFAULT_THRESHOLD};

/// Shown when a message was found but no answer could be given.
pub const NO_ANSWER_RESPONSE: &str = "Sorry, no relevant information found in our database.";

/// Shown when nothing resembling an error message was found.
pub const NO_MESSAGE_RESPONSE: &str = "No error message found in the text.";

/// How a resolution ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// A record matched at or above the threshold.
    Answered,
    /// Records were fetched but none scored high enough.
    NoConfidentMatch,
    /// Extraction produced an empty message; the knowledge base was not queried.
    NoMessageFound,
    /// The knowledge base could not be queried or returned garbage.
    LookupUnavailable,
}

impl ResolutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStatus::Answered => "answered",
            ResolutionStatus::NoConfidentMatch => "no_confident_match",
            ResolutionStatus::NoMessageFound => "no_message_found",
            ResolutionStatus::LookupUnavailable => "lookup_unavailable",
        }
    }
}

impl std::fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub extracted_message: String,
    pub answer: Option<String>,
    pub status: ResolutionStatus,
    /// Best match score, when records were scored.
    pub score: Option<u8>,
}

impl Resolution {
    /// Text to show the user: the answer, or a fallback message.
    pub fn response_text(&self) -> &str {
        match (&self.answer, self.status) {
            (Some(answer), _) => answer,
            (None, ResolutionStatus::NoMessageFound) => NO_MESSAGE_RESPONSE,
            (None, _) => NO_ANSWER_RESPONSE,
        }
    }
}

/// Extracts a message from OCR text and resolves it against a knowledge base.
#[derive(Debug, Clone)]
pub struct ResolutionPipeline {
    extractor: ErrorMessageExtractor,
    threshold: u8,
}

impl Default for ResolutionPipeline {
    fn default() -> Self {
        Self::new(ErrorMessageExtractor::default(), DEFAULT_THRESHOLD)
    }
}

impl ResolutionPipeline {
    pub fn new(extractor: ErrorMessageExtractor, threshold: u8) -> Self {
        Self {
            extractor,
            threshold: threshold.min(100),
        }
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn extractor(&self) -> &ErrorMessageExtractor {
        &self.extractor
    }

    /// Resolve `raw_ocr_text` to an answer.
    ///
    /// Never fails: an empty message, a failed lookup, and a weak match are
    /// all reported through [`Resolution::status`].
    pub async fn resolve(
        &self,
        raw_ocr_text: &str,
        lookup: &dyn KnowledgeBaseLookup,
    ) -> Resolution {
        let message = self.extractor.extract(raw_ocr_text);
        if message.trim().is_empty() {
            info!("No error message found in OCR text");
            return Resolution {
                extracted_message: String::new(),
                answer: None,
                status: ResolutionStatus::NoMessageFound,
                score: None,
            };
        }

        info!("Extracted error message: {}", message);

        let records = match lookup.query(&message).await {
            Ok(records) => records,
            Err(e) => {
                warn!("Knowledge base lookup ({}) failed: {}", lookup.name(), e);
                return Resolution {
                    extracted_message: message,
                    answer: None,
                    status: ResolutionStatus::LookupUnavailable,
                    score: None,
                };
            }
        };

        let result = best_match(&message, &records, self.threshold);
        let (answer, status) = match result.record {
            Some(record) => {
                info!(
                    "Best match '{}' with score {}",
                    record.question, result.score
                );
                (Some(record.answer), ResolutionStatus::Answered)
            }
            None => {
                info!(
                    "No close match found among {} records (best score {})",
                    records.len(),
                    result.score
                );
                (None, ResolutionStatus::NoConfidentMatch)
            }
        };

        Resolution {
            extracted_message: message,
            answer,
            status,
            score: Some(result.score),
        }
    }
}

/// Resolve with the default extractor and threshold.
pub async fn resolve(raw_ocr_text: &str, lookup: &dyn KnowledgeBaseLookup) -> Resolution {
    ResolutionPipeline::default()
        .resolve(raw_ocr_text, lookup)
        .await
}
