//! Core data types and error definitions for the summarization pipeline.

use crate::{
    config::Config,
    extract::{Document, ExtractError},
    language::LanguageCode,
    summarization::{BackendError, ModelKind},
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors produced while splitting input into chunks.
#[derive(Debug, Error)]
pub enum ChunkingError {
    /// The configured chunk budget cannot hold any text.
    #[error("chunk size must be greater than zero")]
    InvalidChunkSize,
}

/// Errors emitted by the summarization pipeline.
#[derive(Debug, Error)]
pub enum SummarizeError {
    /// Request carried no file and no usable text.
    #[error("Please provide either a file or text.")]
    EmptyInput,
    /// Chunking step failed to segment the document.
    #[error("Failed to chunk document: {0}")]
    Chunking(#[from] ChunkingError),
    /// Uploaded document could not be converted to text.
    #[error(transparent)]
    Extract(#[from] ExtractError),
    /// Backend resolution or generation failed.
    #[error("Summarization failed: {0}")]
    Backend(#[from] BackendError),
}

/// Requested summary size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    /// Final pass capped at 120.
    Short,
    /// Final pass capped at 200.
    #[default]
    Medium,
    /// Final pass capped at 300.
    Long,
}

impl SummaryLength {
    /// Every preset, shortest first.
    pub const ALL: [SummaryLength; 3] = [Self::Short, Self::Medium, Self::Long];

    /// Interpret a caller-supplied preset name; unknown values fall back to `medium`.
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "short" => Self::Short,
            "long" => Self::Long,
            "medium" => Self::Medium,
            other => {
                tracing::debug!(requested = other, "Unknown summary length; using medium");
                Self::Medium
            }
        }
    }

    /// Preset name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
            Self::Long => "long",
        }
    }

    /// `max_length` used for the final summarization pass.
    pub const fn final_max_length(self) -> usize {
        match self {
            Self::Short => 120,
            Self::Medium => 200,
            Self::Long => 300,
        }
    }
}

impl fmt::Display for SummaryLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Tunables for the two-phase pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PipelineSettings {
    /// Character budget per chunk.
    pub chunk_max_chars: usize,
    /// `min_length` for per-chunk summaries.
    pub chunk_summary_min_length: usize,
    /// `max_length` for per-chunk summaries.
    pub chunk_summary_max_length: usize,
    /// `min_length` for the final pass, clamped to the preset maximum.
    pub final_min_length: usize,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            chunk_max_chars: 800,
            chunk_summary_min_length: 80,
            chunk_summary_max_length: 200,
            final_min_length: 100,
        }
    }
}

impl PipelineSettings {
    /// Copy pipeline tunables out of the process configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            chunk_max_chars: config.chunk_max_chars,
            chunk_summary_min_length: config.chunk_summary_min_length,
            chunk_summary_max_length: config.chunk_summary_max_length,
            final_min_length: config.final_min_length,
        }
    }
}

/// Single summarization request.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    /// Document to summarize.
    pub document: Document,
    /// Requested preset.
    pub length: SummaryLength,
    /// Caller-supplied language, skipping detection when set.
    pub language: Option<LanguageCode>,
}

/// Result of a completed summarization.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryOutcome {
    /// Filename or `"textarea"`.
    pub source: String,
    /// Language used for routing and script enforcement.
    pub detected_language: LanguageCode,
    /// Model family that produced the summary.
    pub model_used: ModelKind,
    /// Preset honoured.
    pub summary_length: SummaryLength,
    /// Cleaned summary, possibly empty when every chunk summary was discarded.
    pub summary: String,
    /// Number of chunks the input was split into.
    pub chunk_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_presets_parse_leniently() {
        assert_eq!(SummaryLength::from_label("SHORT"), SummaryLength::Short);
        assert_eq!(SummaryLength::from_label(" long "), SummaryLength::Long);
        assert_eq!(SummaryLength::from_label("huge"), SummaryLength::Medium);
        assert_eq!(SummaryLength::from_label(""), SummaryLength::Medium);
    }

    #[test]
    fn length_presets_map_to_final_maximum() {
        let maxima: Vec<usize> = SummaryLength::ALL
            .into_iter()
            .map(SummaryLength::final_max_length)
            .collect();
        assert_eq!(maxima, vec![120, 200, 300]);
    }

    #[test]
    fn outcome_serializes_with_labels() {
        let outcome = SummaryOutcome {
            source: "report.pdf".into(),
            detected_language: "te".into(),
            model_used: ModelKind::IndicBart,
            summary_length: SummaryLength::Short,
            summary: "సారాంశం.".into(),
            chunk_count: 2,
        };
        let value = serde_json::to_value(&outcome).expect("json");
        assert_eq!(value["detected_language"], "te");
        assert_eq!(value["model_used"], "indicbart");
        assert_eq!(value["summary_length"], "short");
        assert_eq!(value["chunk_count"], 2);
    }
}
