//! Two-phase summarization: summarize every chunk, then summarize the joined chunk summaries.

use super::{
    chunking::chunk_text,
    dedupe::dedupe_sentences,
    repeats::{collapse_token_repeats, collapse_word_repeats},
    sanitize::sanitize_summary,
    script::enforce_script,
    types::{PipelineSettings, SummarizeError, SummaryLength},
};
use crate::{
    language::LanguageCode,
    summarization::{GenerationParams, SummarizationBackend},
};

/// Upper bound on cleanup rounds; real output settles after one or two.
const MAX_CLEANUP_ROUNDS: usize = 4;

/// Clean raw model output for `language`.
///
/// Repeats are collapsed, duplicate sentences dropped and artifacts sanitized. Languages with
/// an enforced script are then filtered to that script and sanitized once more, since
/// filtering can strand punctuation at the edges. Deleting placeholders, links or foreign
/// characters can bring new repeats or duplicate sentences together, so the chain reruns
/// until its output stops changing.
pub fn clean_summary(raw: &str, language: &LanguageCode) -> String {
    let mut current = clean_round(raw, language);
    for _ in 1..MAX_CLEANUP_ROUNDS {
        let next = clean_round(&current, language);
        if next == current {
            break;
        }
        current = next;
    }
    current
}

fn clean_round(raw: &str, language: &LanguageCode) -> String {
    let text = collapse_word_repeats(raw);
    let text = collapse_token_repeats(&text);
    let text = dedupe_sentences(&text);
    let text = sanitize_summary(&text);
    if language.script().is_some() {
        sanitize_summary(&enforce_script(&text, language))
    } else {
        text
    }
}

/// Output of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutput {
    /// Cleaned final summary.
    pub summary: String,
    /// Number of chunks the input produced.
    pub chunk_count: usize,
}

/// Stateless driver for the chunk and final passes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryPipeline {
    settings: PipelineSettings,
}

impl SummaryPipeline {
    /// Build a pipeline with the given tunables.
    pub fn new(settings: PipelineSettings) -> Self {
        Self { settings }
    }

    /// Tunables in effect.
    pub fn settings(&self) -> PipelineSettings {
        self.settings
    }

    /// Summarize `text` with `backend`.
    ///
    /// Chunks are summarized sequentially in document order. Chunk summaries that clean down
    /// to nothing are dropped; if none survive the final pass is skipped and the summary is
    /// empty. Any backend error aborts the run.
    pub async fn run(
        &self,
        backend: &dyn SummarizationBackend,
        text: &str,
        language: &LanguageCode,
        length: SummaryLength,
    ) -> Result<PipelineOutput, SummarizeError> {
        let chunks = chunk_text(text, self.settings.chunk_max_chars)?;
        let chunk_count = chunks.len();
        tracing::debug!(
            chunk_count,
            chunk_max_chars = self.settings.chunk_max_chars,
            "Chunked document"
        );

        let chunk_params = GenerationParams::window(
            self.settings.chunk_summary_min_length,
            self.settings.chunk_summary_max_length,
        );
        let mut chunk_summaries = Vec::with_capacity(chunk_count);
        for (index, chunk) in chunks.iter().enumerate() {
            tracing::info!(chunk = index + 1, total = chunk_count, "Summarizing chunk");
            let raw = backend.summarize(chunk, &chunk_params).await?;
            let cleaned = clean_summary(&raw, language);
            if cleaned.is_empty() {
                tracing::debug!(chunk = index + 1, "Chunk summary empty after cleanup");
                continue;
            }
            chunk_summaries.push(cleaned);
        }

        if chunk_summaries.is_empty() {
            tracing::warn!(
                chunk_count,
                language = %language,
                "Every chunk summary was empty; skipping final pass"
            );
            return Ok(PipelineOutput {
                summary: String::new(),
                chunk_count,
            });
        }

        let combined = chunk_summaries.join(" ");
        let final_params =
            GenerationParams::window(self.settings.final_min_length, length.final_max_length());
        tracing::info!(
            combined_chars = combined.chars().count(),
            max_length = final_params.max_length,
            "Generating final summary"
        );
        let raw = backend.summarize(&combined, &final_params).await?;

        Ok(PipelineOutput {
            summary: clean_summary(&raw, language),
            chunk_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarization::BackendError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Backend that records every call and answers from a script.
    struct RecordingBackend {
        calls: Mutex<Vec<(String, GenerationParams)>>,
        respond: fn(&str, usize) -> Result<String, BackendError>,
    }

    impl RecordingBackend {
        fn new(respond: fn(&str, usize) -> Result<String, BackendError>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                respond,
            }
        }

        fn calls(&self) -> Vec<(String, GenerationParams)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SummarizationBackend for RecordingBackend {
        async fn summarize(
            &self,
            text: &str,
            params: &GenerationParams,
        ) -> Result<String, BackendError> {
            let mut calls = self.calls.lock().unwrap();
            calls.push((text.to_string(), *params));
            (self.respond)(text, calls.len())
        }

        fn checkpoint(&self) -> &str {
            "recording"
        }
    }

    fn small_chunks() -> SummaryPipeline {
        SummaryPipeline::new(PipelineSettings {
            chunk_max_chars: 40,
            ..PipelineSettings::default()
        })
    }

    fn long_text() -> String {
        (0..6)
            .map(|index| format!("Sentence {index} has some words in it"))
            .collect::<Vec<_>>()
            .join(". ")
    }

    #[test]
    fn cleanup_handles_combined_artifacts() {
        let raw = "the the the model <extra_id_0> works. the the the model <extra_id_0> works. see http://x";
        assert_eq!(clean_summary(raw, &"en".into()), "the model works. see");
    }

    #[test]
    fn cleanup_enforces_indic_script() {
        let raw = "Summary: తెలుగు వార్త తెలుగు వార్త. English tail.";
        let cleaned = clean_summary(raw, &"te".into());
        assert_eq!(cleaned, "తెలుగు వార్త తెలుగు వార్త.");
    }

    #[test]
    fn cleanup_catches_repeats_exposed_by_deletion() {
        assert_eq!(
            clean_summary("the cat <extra_id_0> cat cat sat", &"en".into()),
            "the cat sat"
        );
        assert_eq!(
            clean_summary("వార్త x వార్త y వార్త", &"te".into()),
            "వార్త"
        );
    }

    #[test]
    fn cleanup_catches_duplicates_exposed_by_deletion() {
        assert_eq!(
            clean_summary("Rain fell <extra_id_3>. Rain fell.", &"en".into()),
            "Rain fell."
        );
        assert_eq!(
            clean_summary("తెలుగు వార్త abc. తెలుగు వార్త.", &"te".into()),
            "తెలుగు వార్త."
        );
    }

    #[test]
    fn cleanup_is_idempotent() {
        let samples = [
            ("the cat <extra_id_0> cat cat sat", "en"),
            ("Rain fell <extra_id_3>. Rain fell.", "en"),
            ("a http://x a www.y.z a. b b <extra_id_1> b", "en"),
            ("తెలుగు వార్త abc. తెలుగు వార్త.", "te"),
            ("वाक्य एक। abc वाक्य एक। दो", "hi"),
        ];
        for (raw, code) in samples {
            let language = LanguageCode::from(code);
            let once = clean_summary(raw, &language);
            assert_eq!(clean_summary(&once, &language), once, "not idempotent for {raw:?}");
        }
    }

    #[tokio::test]
    async fn runs_chunk_then_final_pass() {
        let backend = RecordingBackend::new(|_, call| Ok(format!("Point {call}.")));
        let pipeline = small_chunks();

        let output = pipeline
            .run(&backend, &long_text(), &"en".into(), SummaryLength::Short)
            .await
            .expect("summary");

        let calls = backend.calls();
        assert_eq!(calls.len(), output.chunk_count + 1);
        assert!(output.chunk_count >= 2);

        let (final_input, final_params) = calls.last().expect("final call");
        let expected_input = (1..=output.chunk_count)
            .map(|call| format!("Point {call}."))
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(final_input, &expected_input);
        assert_eq!(final_params.max_length, 120);
        assert_eq!(final_params.min_length, 100);
        assert_eq!(calls[0].1.min_length, 80);
        assert_eq!(calls[0].1.max_length, 200);
        assert_eq!(output.summary, format!("Point {}.", output.chunk_count + 1));
    }

    #[tokio::test]
    async fn empty_chunk_summaries_skip_final_pass() {
        let backend = RecordingBackend::new(|_, _| Ok("<extra_id_0> ...".into()));
        let pipeline = small_chunks();

        let output = pipeline
            .run(&backend, &long_text(), &"en".into(), SummaryLength::Medium)
            .await
            .expect("summary");

        assert_eq!(output.summary, "");
        assert_eq!(backend.calls().len(), output.chunk_count);
    }

    #[tokio::test]
    async fn backend_failure_aborts_run() {
        let backend = RecordingBackend::new(|_, call| {
            if call == 2 {
                Err(BackendError::GenerationFailed("boom".into()))
            } else {
                Ok("Fine.".into())
            }
        });
        let pipeline = small_chunks();

        let error = pipeline
            .run(&backend, &long_text(), &"en".into(), SummaryLength::Long)
            .await
            .expect_err("failure");

        assert!(matches!(error, SummarizeError::Backend(_)));
        assert_eq!(backend.calls().len(), 2);
    }

    #[tokio::test]
    async fn short_input_is_one_chunk() {
        let backend = RecordingBackend::new(|text, _| Ok(text.to_string()));
        let output = SummaryPipeline::default()
            .run(&backend, "Only one sentence", &"en".into(), SummaryLength::Medium)
            .await
            .expect("summary");

        assert_eq!(output.chunk_count, 1);
        assert_eq!(output.summary, "Only one sentence.");
    }
}
