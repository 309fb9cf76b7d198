use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use polysumm::{
    extract::Document,
    language::{LanguageCode, ScriptDetector},
    processing::{
        PipelineSettings, SummaryLength, SummaryPipeline, SummaryRequest, SummaryService,
    },
    summarization::{
        BackendError, BackendRegistry, ExtractiveBackend, GenerationParams, ModelKind,
        SummarizationBackend,
    },
};
use regex::Regex;

const REPEATED: &str = "The network carries two million riders on an ordinary weekday";

/// Backend that echoes the head of its input and then misbehaves the way beam search does.
struct EchoingBackend {
    calls: Mutex<Vec<GenerationParams>>,
}

impl EchoingBackend {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl SummarizationBackend for EchoingBackend {
    async fn summarize(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<String, BackendError> {
        self.calls.lock().unwrap().push(*params);
        let head: String = text.chars().take(params.max_length).collect();
        Ok(format!("{head} service service service <extra_id_0>. {REPEATED}."))
    }

    fn checkpoint(&self) -> &str {
        "echoing"
    }
}

fn english_paragraph() -> String {
    let mut sentences = Vec::new();
    let mut index = 0;
    while sentences.iter().map(|s: &String| s.len() + 2).sum::<usize>() < 2000 {
        index += 1;
        sentences.push(format!(
            "Report section {index} records a separate finding about the regional transit budget"
        ));
        if index % 7 == 0 {
            sentences.push(REPEATED.to_string());
        }
    }
    sentences.insert(3, "Ridership figures <extra_id_1> were audited twice".to_string());
    format!("{}.", sentences.join(". "))
}

#[tokio::test]
async fn long_english_document_yields_clean_summary() {
    let text = english_paragraph();
    assert!(text.chars().count() >= 2000);
    assert_eq!(text.matches(REPEATED).count(), 3);

    let backend = EchoingBackend::new();
    let pipeline = SummaryPipeline::new(PipelineSettings::default());
    let output = pipeline
        .run(&backend, &text, &LanguageCode::new("en"), SummaryLength::Long)
        .await
        .expect("pipeline run");

    assert!(output.chunk_count >= 2, "chunks: {}", output.chunk_count);
    let calls = backend.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), output.chunk_count + 1);
    assert_eq!(calls.last().map(|params| params.max_length), Some(300));

    let summary = output.summary;
    assert!(!summary.is_empty());
    let artifact = Regex::new(r"<extra_id_\d+>").unwrap();
    assert!(!artifact.is_match(&summary), "artifact left in {summary:?}");
    assert!(!summary.contains("service service"), "repeat left in {summary:?}");

    let sentences: Vec<&str> = summary
        .split('.')
        .map(str::trim)
        .filter(|sentence| !sentence.is_empty())
        .collect();
    let unique: HashSet<&str> = sentences.iter().copied().collect();
    assert_eq!(unique.len(), sentences.len(), "duplicates in {summary:?}");
    assert_eq!(summary.matches(REPEATED).count(), 1);

    // Backend output is bounded by max_length plus the fixed tail it appends.
    let tolerance = 120;
    assert!(summary.chars().count() <= SummaryLength::Long.final_max_length() + tolerance);
}

#[tokio::test]
async fn telugu_request_routes_to_indicbart_and_drops_latin() {
    let lead: Arc<dyn SummarizationBackend> = Arc::new(ExtractiveBackend::new("lead"));
    let registry = BackendRegistry::new(lead.clone()).with_backend(ModelKind::IndicBart, lead);
    let service = SummaryService::new(
        registry,
        Box::new(ScriptDetector::new(500, "en")),
        PipelineSettings::default(),
    );

    let text = "తెలుగు భాష చాలా అందమైనది abc. ఇది ఆంధ్రప్రదేశ్ లో మాట్లాడబడుతుంది. \
                తెలుగు భాష చాలా అందమైనది abc.";
    let outcome = service
        .summarize(SummaryRequest {
            document: Document::from_text(text),
            length: SummaryLength::Short,
            language: None,
        })
        .await
        .expect("summary");

    assert_eq!(outcome.detected_language.as_str(), "te");
    assert_eq!(outcome.model_used, ModelKind::IndicBart);
    assert_eq!(outcome.chunk_count, 1);
    assert!(!outcome.summary.is_empty());
    assert!(
        !outcome.summary.chars().any(|c| c.is_ascii_alphabetic()),
        "latin left in {:?}",
        outcome.summary
    );
    assert_eq!(outcome.summary.matches("తెలుగు భాష").count(), 1);
}
