//! Hugging Face inference protocol client.

use super::{BackendError, GenerationParams, SummarizationBackend};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Backend that forwards generation requests to a Hugging Face compatible endpoint.
pub struct HuggingFaceBackend {
    http: Client,
    base_url: String,
    api_token: Option<String>,
    checkpoint: String,
}

impl HuggingFaceBackend {
    /// Build a client for `checkpoint` served under `base_url`.
    pub fn new(
        base_url: String,
        api_token: Option<String>,
        checkpoint: String,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let http = Client::builder()
            .user_agent("polysumm/backend")
            .timeout(timeout)
            .build()
            .map_err(|error| {
                BackendError::ProviderUnavailable(format!("failed to build HTTP client: {error}"))
            })?;
        Ok(Self {
            http,
            base_url,
            api_token,
            checkpoint,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}",
            self.base_url.trim_end_matches('/'),
            self.checkpoint
        )
    }
}

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: String,
}

#[async_trait]
impl SummarizationBackend for HuggingFaceBackend {
    async fn summarize(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<String, BackendError> {
        let payload = json!({
            "inputs": text,
            "parameters": params,
            "options": {
                "wait_for_model": true,
            }
        });

        let mut request = self.http.post(self.endpoint()).json(&payload);
        if let Some(token) = self.api_token.as_deref() {
            request = request.bearer_auth(token);
        }

        tracing::debug!(
            checkpoint = %self.checkpoint,
            input_chars = text.chars().count(),
            max_length = params.max_length,
            min_length = params.min_length,
            "Requesting summary"
        );

        let response = request.send().await.map_err(|error| {
            if error.is_timeout() {
                BackendError::GenerationFailed(format!(
                    "request to {} timed out",
                    self.endpoint()
                ))
            } else {
                BackendError::ProviderUnavailable(format!(
                    "failed to reach {}: {error}",
                    self.base_url
                ))
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND || status == StatusCode::SERVICE_UNAVAILABLE {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::ProviderUnavailable(format!(
                "{} returned {status}: {body}",
                self.endpoint()
            )));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BackendError::GenerationFailed(format!(
                "{} returned {status}: {body}",
                self.checkpoint
            )));
        }

        let items: Vec<SummaryItem> = response.json().await.map_err(|error| {
            BackendError::InvalidResponse(format!("failed to decode summary response: {error}"))
        })?;

        items
            .into_iter()
            .next()
            .map(|item| item.summary_text.trim().to_string())
            .ok_or_else(|| BackendError::InvalidResponse("response contained no summaries".into()))
    }

    fn checkpoint(&self) -> &str {
        &self.checkpoint
    }
}
