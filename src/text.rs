//! Text canonicalization for comparing OCR output against curated questions.

use std::sync::LazyLock;

use regex::Regex;

/// Anything that is not a letter, a combining mark, a number or whitespace.
///
/// Combining marks are kept so Thai vowel and tone marks stay attached to
/// their base consonants.
static NON_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\p{Alphabetic}\p{M}\p{N}\s]+").expect("non-word regex should compile")
});

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex should compile"));

/// Normalize text for comparison.
///
/// Strips punctuation and symbols, collapses whitespace runs to a single
/// space, trims, and lowercases. Applying it twice gives the same result as
/// applying it once.
pub fn normalize(text: &str) -> String {
    let stripped = NON_WORD.replace_all(text, "");
    let collapsed = WHITESPACE_RUN.replace_all(&stripped, " ");
    collapsed.trim().to_lowercase()
}
