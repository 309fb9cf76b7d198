//! Handler for the metrics tool.

use std::sync::Arc;

use crate::processing::SummaryService;
use rmcp::{ErrorData as McpError, model::CallToolResult};
use serde_json::json;

/// Handle the `metrics` tool, returning the current summarization counters.
pub(crate) async fn handle_metrics(
    service: &Arc<SummaryService>,
) -> Result<CallToolResult, McpError> {
    let snapshot = service.metrics_snapshot();
    Ok(CallToolResult::structured(json!({
        "requestsSummarized": snapshot.requests_summarized,
        "chunksSummarized": snapshot.chunks_summarized,
        "emptySummaries": snapshot.empty_summaries,
        "backendFailures": snapshot.backend_failures,
        "lastChunkCount": snapshot.last_chunk_count,
    })))
}
