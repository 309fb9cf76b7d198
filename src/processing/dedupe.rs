//! Drop repeated sentences while keeping first occurrences in order.

use std::collections::HashSet;

const SENTENCE_SEPARATORS: [char; 2] = ['.', '।'];

/// Remove exact duplicate sentences.
///
/// Sentences are split on `.` and `।`, trimmed, and compared exactly; the survivors are
/// rejoined with `". "`. When the input ended with a separator that terminal is restored, so
/// `"A. B. A. C."` becomes `"A. B. C."`. Decimal points split sentences too.
pub fn dedupe_sentences(text: &str) -> String {
    let mut seen = HashSet::new();
    let kept: Vec<&str> = text
        .split(SENTENCE_SEPARATORS)
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty() && seen.insert(*sentence))
        .collect();

    let mut out = kept.join(". ");
    if out.is_empty() {
        return out;
    }
    if let Some(terminal) = text
        .trim_end()
        .chars()
        .last()
        .filter(|c| SENTENCE_SEPARATORS.contains(c))
    {
        out.push(terminal);
    }
    out
}
