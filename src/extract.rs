//! Isolates the error message from raw OCR output.
//!
//! Rules are tried in order and the first one that produces a result wins:
//!
//! 1. Marker pattern: `<marker>: <message>.` captures the message up to and
//!    including the first period on the same line.
//! 2. Keywords: the first configured phrase found anywhere in the text
//!    (case-insensitive) is returned in its canonical form.
//! 3. Fallback: the whole text, trimmed.

use regex::Regex;
use tracing::debug;

/// Marker emitted in front of the message by the error dialogs we read.
///
/// The spelling matches what the dialogs (and therefore OCR) produce.
pub const DEFAULT_MARKER: &str = "AgaregateException";

/// Phrases recognised when the marker pattern is absent.
pub const DEFAULT_KEYWORDS: &[&str] = &["Cannot access IQC Webservice"];

/// Extracts the error message from OCR text.
#[derive(Debug, Clone)]
pub struct ErrorMessageExtractor {
    pattern: Regex,
    keywords: Vec<String>,
}

impl Default for ErrorMessageExtractor {
    fn default() -> Self {
        Self::new(
            DEFAULT_MARKER,
            DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect(),
        )
    }
}

impl ErrorMessageExtractor {
    /// Create an extractor for the given marker token and keyword list.
    ///
    /// The marker is matched literally. Keywords keep their order; the first
    /// listed keyword wins when several are present.
    pub fn new(marker: &str, keywords: Vec<String>) -> Self {
        let pattern = Regex::new(&format!(r"{}:\s(.*?\.)", regex::escape(marker)))
            .expect("escaped marker pattern should compile");

        let keywords = keywords
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        Self { pattern, keywords }
    }

    /// Configured keywords, in priority order.
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Extract the candidate error message from `ocr_text`.
    ///
    /// Returns an empty string only when the input is blank or the marker is
    /// followed directly by a period.
    pub fn extract(&self, ocr_text: &str) -> String {
        if let Some(message) = self.match_pattern(ocr_text) {
            debug!("Marker pattern matched: {:?}", message);
            return message;
        }

        if let Some(keyword) = self.match_keyword(ocr_text) {
            debug!("Keyword matched: {:?}", keyword);
            return keyword.to_string();
        }

        ocr_text.trim().to_string()
    }

    fn match_pattern(&self, text: &str) -> Option<String> {
        let captured = self.pattern.captures(text)?.get(1)?.as_str().trim();

        // "<marker>: ." carries no message
        if captured.trim_end_matches('.').trim().is_empty() {
            return Some(String::new());
        }
        Some(captured.to_string())
    }

    fn match_keyword(&self, text: &str) -> Option<&str> {
        let haystack = text.to_lowercase();
        self.keywords
            .iter()
            .find(|k| haystack.contains(&k.to_lowercase()))
            .map(|k| k.as_str())
    }
}

/// Extract with the default marker and keywords.
pub fn extract(ocr_text: &str) -> String {
    ErrorMessageExtractor::default().extract(ocr_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_rule() {
        let text = "Error dialog\n... AgaregateException: Cannot access IQC Webservice. Details";
        assert_eq!(extract(text), "Cannot access IQC Webservice.");
    }

    #[test]
    fn test_pattern_captures_shortest_span() {
        let text = "AgaregateException: First sentence. Second sentence.";
        assert_eq!(extract(text), "First sentence.");
    }

    #[test]
    fn test_pattern_wins_over_keyword() {
        let text = "Cannot access IQC Webservice\nAgaregateException: Timeout while saving lot.";
        assert_eq!(extract(text), "Timeout while saving lot.");
    }

    #[test]
    fn test_only_first_marker_used() {
        let text = "AgaregateException: One. AgaregateException: Two.";
        assert_eq!(extract(text), "One.");
    }

    #[test]
    fn test_pattern_does_not_cross_lines() {
        // No period on the marker's line, so the pattern fails and the
        // keyword rule takes over.
        let text = "AgaregateException: Cannot access IQC Webservice\nsee log.";
        assert_eq!(extract(text), "Cannot access IQC Webservice");
    }

    #[test]
    fn test_empty_capture() {
        assert_eq!(extract("AgaregateException: . trailing"), "");
    }

    #[test]
    fn test_correct_spelling_is_not_the_marker() {
        let text = "   AggregateException: Something failed.   ";
        assert_eq!(extract(text), "AggregateException: Something failed.");
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let text = "xx CANNOT ACCESS iqc WebService yy";
        assert_eq!(extract(text), "Cannot access IQC Webservice");
    }

    #[test]
    fn test_keyword_order_wins() {
        let extractor = ErrorMessageExtractor::new(
            DEFAULT_MARKER,
            vec!["Second phrase".to_string(), "First phrase".to_string()],
        );
        let text = "first phrase then second phrase";
        assert_eq!(extractor.extract(text), "Second phrase");
    }

    #[test]
    fn test_keywords_trimmed_and_blank_dropped() {
        let extractor = ErrorMessageExtractor::new(
            DEFAULT_MARKER,
            vec!["  Disk full  ".to_string(), "   ".to_string()],
        );
        assert_eq!(extractor.keywords(), &["Disk full".to_string()]);
        assert_eq!(extractor.extract("warning: DISK FULL on C:"), "Disk full");
    }

    #[test]
    fn test_full_fallback() {
        assert_eq!(
            extract("   random unrelated text   "),
            "random unrelated text"
        );
    }

    #[test]
    fn test_blank_input() {
        assert_eq!(extract(""), "");
        assert_eq!(extract(" \n\t "), "");
    }

    #[test]
    fn test_custom_marker_is_literal() {
        let extractor = ErrorMessageExtractor::new("Err(1)", Vec::new());
        assert_eq!(extractor.extract("Err(1): Bad input. more"), "Bad input.");
        assert_eq!(extractor.extract("Err1: Bad input."), "Err1: Bad input.");
    }

    #[test]
    fn test_deterministic() {
        let text = "noise AgaregateException: Cannot access IQC Webservice. noise";
        assert_eq!(extract(text), extract(text));
    }
}
