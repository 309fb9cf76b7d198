//! Handler for the `summarize` MCP tool.

use std::sync::Arc;

use crate::{
    extract::Document,
    language::LanguageCode,
    mcp::{format::summary_payload, handlers::parse_arguments},
    processing::{SummarizeError, SummaryLength, SummaryRequest, SummaryService},
};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;

/// Handle the `summarize` tool invocation.
pub(crate) async fn handle_summarize(
    service: &Arc<SummaryService>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: SummarizeToolRequest = parse_arguments(arguments)?;
    let request = validate_summarize_request(args)?;

    let outcome = service
        .summarize(request)
        .await
        .map_err(map_summarize_error)?;

    Ok(CallToolResult::structured(summary_payload(&outcome)))
}

/// Raw request payload accepted from MCP clients.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SummarizeToolRequest {
    text: String,
    #[serde(default)]
    length: Option<String>,
    #[serde(default)]
    language: Option<String>,
}

fn validate_summarize_request(args: SummarizeToolRequest) -> Result<SummaryRequest, McpError> {
    if args.text.trim().is_empty() {
        return Err(McpError::invalid_params("`text` must not be empty", None));
    }

    Ok(SummaryRequest {
        document: Document::from_text(args.text),
        length: args
            .length
            .as_deref()
            .map(SummaryLength::from_label)
            .unwrap_or_default(),
        language: args
            .language
            .filter(|code| !code.trim().is_empty())
            .map(LanguageCode::new),
    })
}

fn map_summarize_error(error: SummarizeError) -> McpError {
    match error {
        SummarizeError::EmptyInput | SummarizeError::Extract(_) => {
            McpError::invalid_params(error.to_string(), None)
        }
        SummarizeError::Chunking(_) | SummarizeError::Backend(_) => {
            McpError::internal_error(error.to_string(), None)
        }
    }
}
