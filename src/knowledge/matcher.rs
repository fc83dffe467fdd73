//! Fuzzy selection of the best knowledge-base record for a query.

use tracing::debug;

use super::KnowledgeRecord;
use crate::text::normalize;

/// Minimum score a record needs to be accepted.
pub const DEFAULT_THRESHOLD: u8 = 50;

/// Outcome of scanning a set of records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// Best record, if its score reached the threshold.
    pub record: Option<KnowledgeRecord>,
    /// Highest score seen across all records (0 when there were none).
    pub score: u8,
}

/// Similarity of two strings as a percentage, rounded to the nearest integer.
///
/// See [`ratio`] for the exact value.
pub fn similarity(a: &str, b: &str) -> u8 {
    ratio(a, b).round() as u8
}

/// Exact similarity of two strings in `0.0..=100.0`.
///
/// Based on the insertion/deletion edit distance over characters:
/// `100 * (1 - distance / (len_a + len_b))`. Two empty strings are identical.
pub fn ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }

    // distance = total - 2 * lcs, so the ratio reduces to 200 * lcs / total.
    // Equal fractions divide to the same f64, which keeps ties exact.
    let lcs = longest_common_subsequence(&a, &b);
    (200 * lcs) as f64 / total as f64
}

/// Length of the longest common subsequence, using a single rolling row.
fn longest_common_subsequence(a: &[char], b: &[char]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }

    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        let mut diagonal = 0;
        for (j, &cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == cb {
                diagonal + 1
            } else {
                above.max(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Find the record whose question is most similar to `query`.
///
/// Both sides are normalized before scoring. Only a strictly higher score
/// replaces the running best, so ties keep the earliest record and records
/// scoring 0 are never selected. Comparisons use the exact ratio; the
/// reported score is rounded.
pub fn best_match(query: &str, records: &[KnowledgeRecord], threshold: u8) -> MatchResult {
    let query = normalize(query);

    let mut best: Option<&KnowledgeRecord> = None;
    let mut highest = 0.0f64;

    for record in records {
        let question = normalize(&record.question);
        let score = ratio(&query, &question);
        debug!("Comparing '{}' with '{}' - score: {:.2}", query, question, score);

        if score > highest {
            highest = score;
            best = Some(record);
        }
    }

    let score = highest.round() as u8;
    if highest >= f64::from(threshold) {
        MatchResult {
            record: best.cloned(),
            score,
        }
    } else {
        MatchResult {
            record: None,
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(question: &str, answer: &str) -> KnowledgeRecord {
        KnowledgeRecord::new(question, answer)
    }

    #[test]
    fn test_similarity_bounds() {
        assert_eq!(similarity("cannot access", "cannot access"), 100);
        assert_eq!(similarity("", ""), 100);
        assert_eq!(similarity("abc", ""), 0);
        assert_eq!(similarity("abc", "xyz"), 0);
    }

    #[test]
    fn test_similarity_partial() {
        // lcs("abcd", "abce") = 3 -> 6 / 8
        assert_eq!(similarity("abcd", "abce"), 75);
        assert_eq!(similarity("ab", "abab"), 67);
        assert_eq!(similarity("kitten", "sitting"), 62);
    }

    #[test]
    fn test_similarity_is_symmetric() {
        assert_eq!(
            similarity("cannot access iqc", "access iqc webservice"),
            similarity("access iqc webservice", "cannot access iqc")
        );
    }

    #[test]
    fn test_similarity_counts_characters_not_bytes() {
        assert_eq!(similarity("ไม่สามารถ", "ไม่สามารถ"), 100);
        // one Thai character differs out of five on each side
        assert_eq!(similarity("กขคงจ", "กขคงฉ"), 80);
    }

    #[test]
    fn test_empty_records() {
        for threshold in [0, 50, 100] {
            let result = best_match("anything", &[], threshold);
            assert_eq!(result, MatchResult { record: None, score: 0 });
        }
    }

    #[test]
    fn test_exact_match_after_normalization() {
        let records = vec![
            record("printer offline", "Check the cable."),
            record("cannot access iqc webservice", "Restart the IQC service."),
        ];
        let result = best_match("Cannot access IQC Webservice.", &records, DEFAULT_THRESHOLD);
        assert_eq!(result.score, 100);
        assert_eq!(result.record.unwrap().answer, "Restart the IQC service.");
    }

    #[test]
    fn test_threshold_boundary() {
        // 49 a's against 49 a's plus k b's scores 98 / (98 + k).
        let query = "a".repeat(49);
        let fifty = format!("{}{}", query, "b".repeat(98));
        let forty_nine = format!("{}{}", query, "b".repeat(102));
        assert_eq!(similarity(&query, &fifty), 50);
        assert_eq!(similarity(&query, &forty_nine), 49);

        let records = vec![record(&forty_nine, "forty-nine")];
        let result = best_match(&query, &records, 50);
        assert_eq!(result.record, None);
        assert_eq!(result.score, 49);

        let records = vec![record(&forty_nine, "forty-nine"), record(&fifty, "fifty")];
        let result = best_match(&query, &records, 50);
        assert_eq!(result.score, 50);
        assert_eq!(result.record.unwrap().answer, "fifty");
    }

    #[test]
    fn test_tie_keeps_first() {
        let records = vec![
            record("disk full", "first"),
            record("Disk full!", "second"),
            record("disk  FULL", "third"),
        ];
        let result = best_match("disk full", &records, DEFAULT_THRESHOLD);
        assert_eq!(result.score, 100);
        assert_eq!(result.record.unwrap().answer, "first");
    }

    #[test]
    fn test_below_threshold_reports_score() {
        let records = vec![record("printer offline", "Check the cable.")];
        let result = best_match("cannot access iqc webservice", &records, DEFAULT_THRESHOLD);
        assert!(result.record.is_none());
        assert!(result.score < DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_zero_score_never_selected() {
        let records = vec![record("xyz", "only")];
        let result = best_match("abc", &records, 0);
        assert_eq!(result, MatchResult { record: None, score: 0 });
    }

    #[test]
    fn test_threshold_uses_exact_ratio() {
        // 100 / 201 * 100 = 49.75, reported as 50 but still below 50.
        let query = "a".repeat(50);
        let near = format!("{}{}", query, "b".repeat(101));
        assert_eq!(similarity(&query, &near), 50);
        assert!(ratio(&query, &near) < 50.0);

        let result = best_match(&query, &[record(&near, "near")], 50);
        assert_eq!(result.record, None);
        assert_eq!(result.score, 50);
    }

    #[test]
    fn test_rounded_tie_prefers_higher_ratio() {
        // 134 / 201 = 66.67 and 134 / 200 = 67.0 both round to 67.
        let query = "a".repeat(67);
        let lower = format!("{}{}", query, "b".repeat(67));
        let higher = format!("{}{}", query, "b".repeat(66));
        assert_eq!(similarity(&query, &lower), 67);
        assert_eq!(similarity(&query, &higher), 67);

        let records = vec![record(&lower, "lower"), record(&higher, "higher")];
        let result = best_match(&query, &records, DEFAULT_THRESHOLD);
        assert_eq!(result.score, 67);
        assert_eq!(result.record.unwrap().answer, "higher");
    }

    #[test]
    fn test_duplicate_questions_allowed() {
        let records = vec![
            record("cannot access iqc webservice", "Restart the IQC service."),
            record("cannot access iqc webservice", "Call support."),
        ];
        let result = best_match("cannot access iqc webservice", &records, DEFAULT_THRESHOLD);
        assert_eq!(result.record.unwrap().answer, "Restart the IQC service.");
    }
}
