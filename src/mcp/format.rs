//! Formatting helpers shared across MCP handlers and resources.

use crate::{
    config::SummarizerProvider,
    processing::{PipelineSettings, SummaryLength},
    summarization::{BackendStatus, GenerationParams},
};
use rmcp::model::ResourceContents;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Value, json};

pub(crate) const APPLICATION_JSON: &str = "application/json";

/// Build the health payload describing which model families loaded.
pub(crate) fn health_payload(provider: SummarizerProvider, statuses: &[BackendStatus]) -> String {
    let degraded = statuses.iter().any(|status| !status.available);
    let payload = json!({
        "status": if degraded { "degraded" } else { "ok" },
        "provider": provider_label(provider),
        "backends": statuses,
    });

    serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
}

pub(crate) fn provider_label(provider: SummarizerProvider) -> &'static str {
    match provider {
        SummarizerProvider::HuggingFace => "huggingface",
        SummarizerProvider::Extractive => "extractive",
    }
}

/// Serialize a value to JSON, falling back to compact formatting on error.
pub(crate) fn serialize_json<T: Serialize>(value: &T, context_uri: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|error| {
        tracing::warn!(uri = context_uri, %error, "Failed to serialize JSON prettily");
        serde_json::to_string(value).unwrap_or_else(|_| "{}".into())
    })
}

/// Build JSON resource contents for MCP resource responses.
pub(crate) fn json_resource_contents(uri: &str, text: String) -> ResourceContents {
    ResourceContents::TextResourceContents {
        uri: uri.to_string(),
        mime_type: Some(APPLICATION_JSON.into()),
        text,
        meta: None,
    }
}

/// Effective pipeline settings exposed through `mcp://settings`.
#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct SettingsSnapshot {
    /// Characters per chunk before the first pass.
    pub(crate) chunk_max_chars: usize,
    /// Length window for per-chunk summaries.
    pub(crate) chunk_summary: LengthWindow,
    /// `min_length` of the final pass.
    pub(crate) final_min_length: usize,
    /// Final `max_length` per preset.
    pub(crate) length_presets: Vec<LengthPreset>,
    /// Fixed decoding settings sent with every backend call.
    pub(crate) decoding: DecodingSnapshot,
}

/// Inclusive length bounds for one pass.
#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct LengthWindow {
    pub(crate) min_length: usize,
    pub(crate) max_length: usize,
}

/// One length preset and its final `max_length`.
#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct LengthPreset {
    pub(crate) name: &'static str,
    pub(crate) max_length: usize,
}

/// Beam-search settings shared by both passes.
#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct DecodingSnapshot {
    pub(crate) num_beams: u32,
    pub(crate) no_repeat_ngram_size: u32,
    pub(crate) repetition_penalty: f32,
    pub(crate) length_penalty: f32,
    pub(crate) do_sample: bool,
}

impl SettingsSnapshot {
    pub(crate) fn from_settings(settings: PipelineSettings) -> Self {
        let params = GenerationParams::window(
            settings.chunk_summary_min_length,
            settings.chunk_summary_max_length,
        );
        Self {
            chunk_max_chars: settings.chunk_max_chars,
            chunk_summary: LengthWindow {
                min_length: params.min_length,
                max_length: params.max_length,
            },
            final_min_length: settings.final_min_length,
            length_presets: SummaryLength::ALL
                .into_iter()
                .map(|preset| LengthPreset {
                    name: preset.label(),
                    max_length: preset.final_max_length(),
                })
                .collect(),
            decoding: DecodingSnapshot {
                num_beams: params.num_beams,
                no_repeat_ngram_size: params.no_repeat_ngram_size,
                repetition_penalty: params.repetition_penalty,
                length_penalty: params.length_penalty,
                do_sample: params.do_sample,
            },
        }
    }
}

/// Shape a summary outcome for tool responses.
pub(crate) fn summary_payload(outcome: &crate::processing::SummaryOutcome) -> Value {
    json!({
        "source": outcome.source,
        "detectedLanguage": outcome.detected_language,
        "modelUsed": outcome.model_used,
        "summaryLength": outcome.summary_length,
        "summary": outcome.summary,
        "chunkCount": outcome.chunk_count,
    })
}
