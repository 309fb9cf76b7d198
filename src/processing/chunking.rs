//! Sentence-aligned chunking of long input.
//!
//! Summarization checkpoints accept a bounded input window, so long documents are split into
//! chunks before the first summarization pass. Boundaries are heuristic: a sentence ends at
//! the literal `". "` sequence, which means abbreviations and decimals can split early. Chunk
//! length is counted in characters, not bytes, so Indic scripts get the same budget as Latin.

use super::types::ChunkingError;

/// Marks accepted as the end of the final sentence.
pub(crate) const SENTENCE_TERMINALS: [char; 4] = ['.', '!', '?', '।'];

const SENTENCE_DELIMITER: &str = ". ";

/// Trim `text` and make sure it ends with a sentence terminal, appending `.` if needed.
pub fn ensure_sentence_end(text: &str) -> String {
    let trimmed = text.trim();
    let mut out = String::with_capacity(trimmed.len() + 1);
    out.push_str(trimmed);
    if !trimmed.ends_with(SENTENCE_TERMINALS) {
        out.push('.');
    }
    out
}

/// Split text into ordered chunks of at most `max_chunk_size` characters.
///
/// Sentences accumulate greedily; when the next sentence would bring the buffer to the limit
/// the buffer is closed. A single sentence longer than the limit becomes its own chunk. Empty
/// input yields the lone chunk `"."`; callers reject blank documents before chunking.
pub fn chunk_text(text: &str, max_chunk_size: usize) -> Result<Vec<String>, ChunkingError> {
    if max_chunk_size == 0 {
        return Err(ChunkingError::InvalidChunkSize);
    }

    let text = ensure_sentence_end(text);
    let sentences: Vec<&str> = text.split(SENTENCE_DELIMITER).collect();
    let last = sentences.len().saturating_sub(1);

    let mut chunks = Vec::new();
    let mut buffer = String::new();
    let mut buffer_chars = 0;

    for (index, sentence) in sentences.into_iter().enumerate() {
        let sentence_chars = sentence.chars().count();
        if !buffer.is_empty() && buffer_chars + sentence_chars >= max_chunk_size {
            chunks.push(buffer.trim_end().to_string());
            buffer.clear();
            buffer_chars = 0;
        }

        buffer.push_str(sentence);
        buffer_chars += sentence_chars;
        // The final piece already carries its terminal.
        let separator = if index == last { " " } else { SENTENCE_DELIMITER };
        buffer.push_str(separator);
        buffer_chars += separator.len();
    }

    if !buffer.trim().is_empty() {
        chunks.push(buffer.trim_end().to_string());
    }

    Ok(chunks)
}
