//! Handler for the languages tool.

use crate::language::LanguageTable;
use rmcp::{ErrorData as McpError, model::CallToolResult};

/// Handle the `languages` tool, returning routing sets and the script table.
pub(crate) async fn handle_languages() -> Result<CallToolResult, McpError> {
    let table = serde_json::to_value(LanguageTable::current())
        .map_err(|err| McpError::internal_error(format!("Failed to encode table: {err}"), None))?;
    Ok(CallToolResult::structured(table))
}
