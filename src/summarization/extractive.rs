//! Deterministic lead-sentence summarizer used offline and in tests.

use super::{BackendError, GenerationParams, SummarizationBackend};
use async_trait::async_trait;

const TERMINALS: [char; 4] = ['.', '!', '?', '।'];

/// Backend that keeps leading sentences until `max_length` characters are used.
///
/// `min_length` is advisory: the output never pads, so short inputs produce short summaries.
pub struct ExtractiveBackend {
    checkpoint: String,
}

impl ExtractiveBackend {
    /// Create a backend reporting `checkpoint` as its identifier.
    pub fn new(checkpoint: impl Into<String>) -> Self {
        Self {
            checkpoint: checkpoint.into(),
        }
    }
}

/// Split text after each sentence terminal, keeping the terminal with its sentence.
fn sentences(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    for (index, c) in text.char_indices() {
        if TERMINALS.contains(&c) {
            let end = index + c.len_utf8();
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                out.push(sentence);
            }
            start = end;
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        out.push(tail);
    }
    out
}

fn lead_summary(text: &str, max_length: usize) -> String {
    let mut summary = String::new();
    let mut used = 0;
    for sentence in sentences(text) {
        let length = sentence.chars().count();
        let separator = usize::from(!summary.is_empty());
        if used + separator + length > max_length {
            if summary.is_empty() {
                summary.extend(sentence.chars().take(max_length));
            }
            break;
        }
        if separator == 1 {
            summary.push(' ');
        }
        summary.push_str(sentence);
        used += separator + length;
    }
    summary
}

#[async_trait]
impl SummarizationBackend for ExtractiveBackend {
    async fn summarize(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<String, BackendError> {
        Ok(lead_summary(text, params.max_length))
    }

    fn checkpoint(&self) -> &str {
        &self.checkpoint
    }
}
