//! Summarization service coordinating detection, routing, and the two-phase pipeline.

use crate::{
    config::Config,
    language::{LanguageDetector, TrigramDetector},
    metrics::{MetricsSnapshot, SummaryMetrics},
    processing::{
        pipeline::SummaryPipeline,
        types::{PipelineSettings, SummarizeError, SummaryOutcome, SummaryRequest},
    },
    summarization::{BackendError, BackendRegistry, BackendStatus},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Runs summarization requests end to end.
///
/// The service owns the backend registry, the language detector, and the metrics registry so
/// that the HTTP surface and the MCP tools share the same components. Construct it once near
/// process start and share it through an `Arc`.
pub struct SummaryService {
    registry: BackendRegistry,
    detector: Box<dyn LanguageDetector>,
    pipeline: SummaryPipeline,
    metrics: Arc<SummaryMetrics>,
}

/// Abstraction over the summarization service used by external surfaces (HTTP, MCP).
#[async_trait]
pub trait SummaryApi: Send + Sync {
    /// Summarize a document.
    async fn summarize(&self, request: SummaryRequest) -> Result<SummaryOutcome, SummarizeError>;

    /// Availability of every model family.
    fn backend_statuses(&self) -> Vec<BackendStatus>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;

    /// Pipeline tunables in effect.
    fn settings(&self) -> PipelineSettings;
}

impl SummaryService {
    /// Assemble a service from already-built parts.
    pub fn new(
        registry: BackendRegistry,
        detector: Box<dyn LanguageDetector>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            registry,
            detector,
            pipeline: SummaryPipeline::new(settings),
            metrics: Arc::new(SummaryMetrics::new()),
        }
    }

    /// Load backends and tunables described by the configuration.
    pub fn from_config(config: &Config) -> Result<Self, BackendError> {
        tracing::info!(provider = ?config.summarizer_provider, "Initializing summarization backends");
        let registry = BackendRegistry::from_config(config)?;
        let detector = TrigramDetector::new(
            config.language_sample_chars,
            config.default_latin_language.clone(),
        );
        Ok(Self::new(
            registry,
            Box::new(detector),
            PipelineSettings::from_config(config),
        ))
    }

    /// Summarize one request, tagging all of its logs with a fresh request id.
    pub async fn summarize(
        &self,
        request: SummaryRequest,
    ) -> Result<SummaryOutcome, SummarizeError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "summarize",
            %request_id,
            source = %request.document.source
        );
        self.summarize_inner(request).instrument(span).await
    }

    async fn summarize_inner(
        &self,
        request: SummaryRequest,
    ) -> Result<SummaryOutcome, SummarizeError> {
        let SummaryRequest {
            document,
            length,
            language,
        } = request;

        if document.text.trim().is_empty() {
            return Err(SummarizeError::EmptyInput);
        }

        let language = match language {
            Some(code) if !code.as_str().is_empty() => code,
            _ => self.detector.detect(&document.text),
        };

        let resolved = self.registry.resolve(&language).map_err(|error| {
            self.metrics.record_backend_failure();
            tracing::error!(%error, language = %language, "No backend for language");
            SummarizeError::from(error)
        })?;

        tracing::info!(
            language = %language,
            model = %resolved.kind,
            length = %length,
            chars = document.text.chars().count(),
            "Summarizing document"
        );

        let output = match self
            .pipeline
            .run(resolved.backend.as_ref(), &document.text, &language, length)
            .await
        {
            Ok(output) => output,
            Err(error) => {
                if matches!(error, SummarizeError::Backend(_)) {
                    self.metrics.record_backend_failure();
                }
                tracing::error!(%error, model = %resolved.kind, "Summarization failed");
                return Err(error);
            }
        };

        self.metrics
            .record_summary(output.chunk_count as u64, output.summary.is_empty());
        tracing::info!(
            chunks = output.chunk_count,
            summary_chars = output.summary.chars().count(),
            "Summary ready"
        );

        Ok(SummaryOutcome {
            source: document.source,
            detected_language: language,
            model_used: resolved.kind,
            summary_length: length,
            summary: output.summary,
            chunk_count: output.chunk_count,
        })
    }

    /// Availability of every model family.
    pub fn backend_statuses(&self) -> Vec<BackendStatus> {
        self.registry.statuses()
    }

    /// Return the current summarization metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Pipeline tunables in effect.
    pub fn settings(&self) -> PipelineSettings {
        self.pipeline.settings()
    }
}

#[async_trait]
impl SummaryApi for SummaryService {
    async fn summarize(&self, request: SummaryRequest) -> Result<SummaryOutcome, SummarizeError> {
        SummaryService::summarize(self, request).await
    }

    fn backend_statuses(&self) -> Vec<BackendStatus> {
        SummaryService::backend_statuses(self)
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        SummaryService::metrics_snapshot(self)
    }

    fn settings(&self) -> PipelineSettings {
        SummaryService::settings(self)
    }
}
