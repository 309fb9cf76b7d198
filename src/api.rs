//! HTTP surface for the summarization service.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /summarize` – Multipart form with an optional `file` (pdf, docx, txt), optional
//!   `text`, a `length` preset (`short` | `medium` | `long`) and an optional `language` override.
//!   Returns `source`, `detected_language`, `model_used`, `summary_length`, `summary`, and
//!   `chunk_count`.
//! - `GET /languages` – Routing sets and the per-language script table.
//! - `GET /health` – Which model families loaded.
//! - `GET /metrics` – Summarization counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! The HTTP surface shares the same service with the MCP server, so behavior is identical
//! across interfaces.

use crate::extract::{Document, ExtractError, extract_document};
use crate::language::{LanguageCode, LanguageTable};
use crate::metrics::MetricsSnapshot;
use crate::processing::{SummarizeError, SummaryApi, SummaryLength, SummaryOutcome, SummaryRequest};
use crate::summarization::BackendStatus;
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State, multipart::MultipartError},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

/// Build the HTTP router; request bodies above `max_upload_bytes` are rejected.
pub fn create_router<S>(service: Arc<S>, max_upload_bytes: usize) -> Router
where
    S: SummaryApi + 'static,
{
    Router::new()
        .route("/summarize", post(summarize_document::<S>))
        .route("/languages", get(get_languages))
        .route("/health", get(get_health::<S>))
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(service)
}

/// Uploaded file pulled out of the multipart form.
struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

/// Fields of the `POST /summarize` form.
#[derive(Default)]
struct SummarizeForm {
    file: Option<Upload>,
    text: Option<String>,
    length: Option<String>,
    language: Option<String>,
}

async fn read_form(multipart: &mut Multipart) -> Result<SummarizeForm, AppError> {
    let mut form = SummarizeForm::default();
    while let Some(field) = multipart.next_field().await.map_err(AppError::multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.map_err(AppError::multipart)?;
                // Browsers submit an empty part when no file is chosen.
                if !filename.is_empty() || !bytes.is_empty() {
                    form.file = Some(Upload {
                        filename,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            "text" => form.text = Some(field.text().await.map_err(AppError::multipart)?),
            "length" => form.length = Some(field.text().await.map_err(AppError::multipart)?),
            "language" => form.language = Some(field.text().await.map_err(AppError::multipart)?),
            other => tracing::debug!(field = other, "Ignoring unknown form field"),
        }
    }
    Ok(form)
}

/// Summarize an uploaded file or pasted text.
///
/// A file takes precedence over text when both are supplied. Extraction runs on a blocking
/// thread because PDF parsing is CPU-bound.
async fn summarize_document<S>(
    State(service): State<Arc<S>>,
    mut multipart: Multipart,
) -> Result<Json<SummaryOutcome>, AppError>
where
    S: SummaryApi,
{
    let form = read_form(&mut multipart).await?;

    let document = match form.file {
        Some(Upload { filename, bytes }) => {
            tracing::info!(file = %filename, bytes = bytes.len(), "Received upload");
            tokio::task::spawn_blocking(move || extract_document(&filename, &bytes))
                .await
                .map_err(|error| AppError::Internal(format!("extraction task failed: {error}")))?
                .map_err(SummarizeError::from)?
        }
        None => match form.text {
            Some(text) if !text.trim().is_empty() => Document::from_text(text),
            _ => return Err(SummarizeError::EmptyInput.into()),
        },
    };

    let request = SummaryRequest {
        document,
        length: form
            .length
            .as_deref()
            .map(SummaryLength::from_label)
            .unwrap_or_default(),
        language: form
            .language
            .filter(|code| !code.trim().is_empty())
            .map(LanguageCode::new),
    };

    let outcome = service.summarize(request).await?;
    tracing::info!(
        source = %outcome.source,
        language = %outcome.detected_language,
        model = %outcome.model_used,
        chunks = outcome.chunk_count,
        "Summarize request completed"
    );
    Ok(Json(outcome))
}

/// Return the routing sets and script table.
async fn get_languages() -> Json<LanguageTable> {
    Json(LanguageTable::current())
}

/// Response body for `GET /health`.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    backends: Vec<BackendStatus>,
}

/// Report which model families loaded; `degraded` means requests may use fallbacks.
async fn get_health<S>(State(service): State<Arc<S>>) -> Json<HealthResponse>
where
    S: SummaryApi,
{
    let backends = service.backend_statuses();
    let status = if backends.iter().all(|backend| backend.available) {
        "ok"
    } else {
        "degraded"
    };
    Json(HealthResponse { status, backends })
}

/// Return summarization counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsSnapshot>
where
    S: SummaryApi,
{
    Json(service.metrics_snapshot())
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "summarize",
                method: "POST",
                path: "/summarize",
                description: "Summarize an uploaded pdf/docx/txt file or pasted text (multipart form). Response returns { \"summary\": string, \"detected_language\": string, \"model_used\": string, \"chunk_count\": number }.",
                request_example: Some(json!({
                    "file": "@report.pdf",
                    "text": "Optional pasted text used when no file is sent",
                    "length": "medium",
                    "language": "te"
                })),
            },
            CommandDescriptor {
                name: "languages",
                method: "GET",
                path: "/languages",
                description: "List the Indic and mBART routing sets and the script enforced per language.",
                request_example: None,
            },
            CommandDescriptor {
                name: "health",
                method: "GET",
                path: "/health",
                description: "Report which model families loaded and which checkpoint each serves.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return summarization counters useful for observability dashboards.",
                request_example: None,
            },
        ],
    })
}

enum AppError {
    Summarize(SummarizeError),
    BadRequest(String),
    Internal(String),
}

impl AppError {
    fn multipart(error: MultipartError) -> Self {
        Self::BadRequest(format!("invalid multipart form: {error}"))
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Summarize(SummarizeError::EmptyInput) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Summarize(SummarizeError::Extract(ExtractError::UnsupportedFormat(_))) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            Self::Summarize(SummarizeError::Extract(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Summarize(SummarizeError::Backend(_)) => StatusCode::BAD_GATEWAY,
            Self::Summarize(SummarizeError::Chunking(_)) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Summarize(error) => error.to_string(),
            Self::BadRequest(message) | Self::Internal(message) => message.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!(%status, error = %message, "Request failed");
        } else {
            tracing::warn!(%status, error = %message, "Request rejected");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<SummarizeError> for AppError {
    fn from(inner: SummarizeError) -> Self {
        Self::Summarize(inner)
    }
}
