//! Summarization backends and per-language model routing.
//!
//! Backends are opaque: they take text plus generation parameters and return free-form model
//! output that the processing layer cleans up afterwards. The [`BackendRegistry`] is built once
//! at startup from whichever models loaded successfully and resolves a backend per request
//! from the detected language, walking the designated fallback chain when the preferred model
//! is unavailable.

mod extractive;
mod huggingface;

pub use extractive::ExtractiveBackend;
pub use huggingface::HuggingFaceBackend;

use crate::config::{Config, SummarizerProvider};
use crate::language::LanguageCode;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by summarization backends.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Backend failed to load, is disabled, or could not be reached.
    #[error("Summarization backend unavailable: {0}")]
    ProviderUnavailable(String),
    /// Backend answered with an error.
    #[error("Failed to generate summary: {0}")]
    GenerationFailed(String),
    /// Backend response could not be parsed.
    #[error("Malformed backend response: {0}")]
    InvalidResponse(String),
}

/// Pretrained model families the service can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelKind {
    /// IndicBART, preferred for Indic languages.
    #[serde(rename = "indicbart")]
    IndicBart,
    /// mBART-50, the primary multilingual model.
    #[serde(rename = "mbart")]
    MBart,
    /// mT5, used for languages outside the mBART-50 set.
    #[serde(rename = "mt5")]
    Mt5,
}

impl ModelKind {
    /// Every model family, primary first.
    pub const ALL: [ModelKind; 3] = [ModelKind::MBart, ModelKind::IndicBart, ModelKind::Mt5];

    /// Label reported to callers as `model_used`.
    pub const fn label(self) -> &'static str {
        match self {
            ModelKind::IndicBart => "indicbart",
            ModelKind::MBart => "mbart",
            ModelKind::Mt5 => "mt5",
        }
    }

    /// Checkpoint loaded when no override is configured.
    pub const fn default_checkpoint(self) -> &'static str {
        match self {
            ModelKind::IndicBart => "ai4bharat/IndicBART",
            ModelKind::MBart => "facebook/mbart-large-50-many-to-many-mmt",
            ModelKind::Mt5 => "google/mt5-small",
        }
    }

    /// Model preferred for a language before availability is considered.
    pub fn preferred_for(language: &LanguageCode) -> ModelKind {
        if language.is_indic() {
            ModelKind::IndicBart
        } else if language.is_mbart_supported() {
            ModelKind::MBart
        } else {
            ModelKind::Mt5
        }
    }

    /// Designated replacement when this model is unavailable.
    fn fallback_for(self, language: &LanguageCode) -> Option<ModelKind> {
        match self {
            ModelKind::IndicBart if language.is_mbart_supported() => Some(ModelKind::MBart),
            ModelKind::IndicBart => Some(ModelKind::Mt5),
            ModelKind::Mt5 => Some(ModelKind::MBart),
            ModelKind::MBart => None,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ModelKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "indicbart" => Ok(Self::IndicBart),
            "mbart" => Ok(Self::MBart),
            "mt5" => Ok(Self::Mt5),
            _ => Err(()),
        }
    }
}

/// Decoding parameters forwarded to the backend on every call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    /// Upper bound on generated length.
    pub max_length: usize,
    /// Lower bound on generated length, never above `max_length`.
    pub min_length: usize,
    /// Beam search width.
    pub num_beams: u32,
    /// Size of n-grams that may not repeat in the output.
    pub no_repeat_ngram_size: u32,
    /// Penalty applied to already generated tokens.
    pub repetition_penalty: f32,
    /// Exponential length penalty used by beam search.
    pub length_penalty: f32,
    /// Sampling is always off so output is deterministic.
    pub do_sample: bool,
}

impl GenerationParams {
    /// Fixed beam-search settings with the given length window.
    pub fn window(min_length: usize, max_length: usize) -> Self {
        Self {
            max_length,
            min_length: min_length.min(max_length),
            num_beams: 6,
            no_repeat_ngram_size: 4,
            repetition_penalty: 3.0,
            length_penalty: 1.2,
            do_sample: false,
        }
    }
}

/// Interface implemented by summarization backends.
#[async_trait]
pub trait SummarizationBackend: Send + Sync {
    /// Summarize `text` under the supplied generation parameters.
    async fn summarize(&self, text: &str, params: &GenerationParams)
    -> Result<String, BackendError>;

    /// Identifier of the checkpoint served by this backend.
    fn checkpoint(&self) -> &str;
}

/// Backend chosen for a single request.
#[derive(Clone)]
pub struct ResolvedBackend {
    /// Model family actually used.
    pub kind: ModelKind,
    /// Handle to the backend.
    pub backend: Arc<dyn SummarizationBackend>,
}

/// Availability of one model family, as reported by health surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct BackendStatus {
    /// Model family.
    pub model: ModelKind,
    /// Whether the model loaded at startup.
    pub available: bool,
    /// Checkpoint served when available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint: Option<String>,
}

/// Read-only table of loaded backends, built once per process.
#[derive(Clone)]
pub struct BackendRegistry {
    backends: BTreeMap<ModelKind, Arc<dyn SummarizationBackend>>,
}

impl BackendRegistry {
    /// Start a registry with the mandatory mBART backend.
    pub fn new(primary: Arc<dyn SummarizationBackend>) -> Self {
        let mut backends = BTreeMap::new();
        backends.insert(ModelKind::MBart, primary);
        Self { backends }
    }

    /// Register an optional backend.
    pub fn with_backend(mut self, kind: ModelKind, backend: Arc<dyn SummarizationBackend>) -> Self {
        self.backends.insert(kind, backend);
        self
    }

    /// Load every model enabled in the configuration.
    pub fn from_config(config: &Config) -> Result<Self, BackendError> {
        let timeout = Duration::from_secs(config.backend_timeout_secs);
        let build = |kind: ModelKind| -> Result<Arc<dyn SummarizationBackend>, BackendError> {
            let checkpoint = config.checkpoint_for(kind).to_string();
            let backend: Arc<dyn SummarizationBackend> = match config.summarizer_provider {
                SummarizerProvider::HuggingFace => Arc::new(HuggingFaceBackend::new(
                    config.hf_api_url.clone(),
                    config.hf_api_token.clone(),
                    checkpoint,
                    timeout,
                )?),
                SummarizerProvider::Extractive => Arc::new(ExtractiveBackend::new(checkpoint)),
            };
            Ok(backend)
        };

        let mut registry = Self::new(build(ModelKind::MBart)?);
        for kind in [ModelKind::IndicBart, ModelKind::Mt5] {
            if config.disabled_models.contains(&kind) {
                tracing::warn!(model = %kind, "Model disabled; requests will use its fallback");
                continue;
            }
            match build(kind) {
                Ok(backend) => registry = registry.with_backend(kind, backend),
                Err(error) => {
                    tracing::warn!(model = %kind, %error, "Could not load optional model");
                }
            }
        }

        tracing::info!(
            provider = ?config.summarizer_provider,
            models = ?registry.backends.keys().collect::<Vec<_>>(),
            "Summarization backends ready"
        );
        Ok(registry)
    }

    /// Whether a model family loaded.
    pub fn is_available(&self, kind: ModelKind) -> bool {
        self.backends.contains_key(&kind)
    }

    /// Availability report for every model family.
    pub fn statuses(&self) -> Vec<BackendStatus> {
        ModelKind::ALL
            .into_iter()
            .map(|model| {
                let backend = self.backends.get(&model);
                BackendStatus {
                    model,
                    available: backend.is_some(),
                    checkpoint: backend.map(|backend| backend.checkpoint().to_string()),
                }
            })
            .collect()
    }

    /// Pick the backend for a language, following fallbacks for unavailable models.
    pub fn resolve(&self, language: &LanguageCode) -> Result<ResolvedBackend, BackendError> {
        let mut kind = ModelKind::preferred_for(language);
        loop {
            if let Some(backend) = self.backends.get(&kind) {
                return Ok(ResolvedBackend {
                    kind,
                    backend: backend.clone(),
                });
            }
            match kind.fallback_for(language) {
                Some(next) => {
                    tracing::debug!(
                        language = %language,
                        unavailable = %kind,
                        fallback = %next,
                        "Preferred model unavailable; using fallback"
                    );
                    kind = next;
                }
                None => {
                    return Err(BackendError::ProviderUnavailable(format!(
                        "no backend available for language '{language}'"
                    )));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(kinds: &[ModelKind]) -> BackendRegistry {
        let mut registry =
            BackendRegistry::new(Arc::new(ExtractiveBackend::new("mbart-checkpoint")));
        for kind in kinds {
            registry = registry.with_backend(*kind, Arc::new(ExtractiveBackend::new(kind.label())));
        }
        registry
    }

    #[test]
    fn indic_languages_prefer_indicbart() {
        let registry = registry_with(&[ModelKind::IndicBart, ModelKind::Mt5]);
        let resolved = registry.resolve(&"te".into()).expect("backend");
        assert_eq!(resolved.kind, ModelKind::IndicBart);
        assert_eq!(resolved.backend.checkpoint(), "indicbart");
    }

    #[test]
    fn missing_indicbart_falls_back_by_mbart_coverage() {
        let registry = registry_with(&[ModelKind::Mt5]);
        assert_eq!(registry.resolve(&"hi".into()).unwrap().kind, ModelKind::MBart);
        assert_eq!(registry.resolve(&"te".into()).unwrap().kind, ModelKind::Mt5);
    }

    #[test]
    fn missing_mt5_falls_back_to_mbart() {
        let registry = registry_with(&[]);
        assert_eq!(registry.resolve(&"sv".into()).unwrap().kind, ModelKind::MBart);
        assert_eq!(registry.resolve(&"kn".into()).unwrap().kind, ModelKind::MBart);
    }

    #[test]
    fn mbart_languages_route_to_mbart() {
        let registry = registry_with(&[ModelKind::IndicBart, ModelKind::Mt5]);
        assert_eq!(registry.resolve(&"fr".into()).unwrap().kind, ModelKind::MBart);
        assert_eq!(registry.resolve(&"xx".into()).unwrap().kind, ModelKind::Mt5);
    }

    #[test]
    fn statuses_report_every_model() {
        let registry = registry_with(&[ModelKind::Mt5]);
        let statuses = registry.statuses();
        assert_eq!(statuses.len(), 3);
        let indic = statuses
            .iter()
            .find(|status| status.model == ModelKind::IndicBart)
            .expect("indicbart status");
        assert!(!indic.available);
        assert!(indic.checkpoint.is_none());
    }

    #[test]
    fn generation_window_clamps_min_length() {
        let params = GenerationParams::window(100, 60);
        assert_eq!(params.min_length, 60);
        assert_eq!(params.num_beams, 6);
        assert_eq!(params.no_repeat_ngram_size, 4);
        assert!(!params.do_sample);
    }

    #[test]
    fn model_kind_round_trips_labels() {
        for kind in ModelKind::ALL {
            assert_eq!(kind.label().parse::<ModelKind>(), Ok(kind));
        }
    }
}
