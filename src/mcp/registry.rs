//! Name-keyed dispatch tables for the MCP server.
//!
//! Tools (`summarize`, `languages`, `metrics`) and resources (`mcp://health`,
//! `mcp://settings`) register a plain function here; `call_tool` and `read_resource` look the
//! handler up by name or URI instead of matching on strings.

use std::{collections::HashMap, future::Future, pin::Pin};

use rmcp::ErrorData as McpError;
use rmcp::model::{
    CallToolRequestParam, CallToolResult, ReadResourceRequestParam, ReadResourceResult,
};

use super::server::PolysummMcpServer;

/// Boxed future returned by a resource reader.
pub type ResourceFuture =
    Pin<Box<dyn Future<Output = Result<ReadResourceResult, McpError>> + Send>>;
/// Boxed future returned by a tool handler.
pub type ToolFuture = Pin<Box<dyn Future<Output = Result<CallToolResult, McpError>> + Send>>;

/// Reads one resource. Handlers clone what they need from the server before boxing.
pub type ResourceHandler = fn(&PolysummMcpServer, ReadResourceRequestParam) -> ResourceFuture;
/// Runs one tool against the shared summary service.
pub type ToolHandler = fn(&PolysummMcpServer, CallToolRequestParam) -> ToolFuture;

/// Handlers for every summarization tool and diagnostic resource the server exposes.
#[derive(Default)]
pub struct Registry {
    /// Resource readers keyed by URI.
    pub resources: HashMap<&'static str, ResourceHandler>,
    /// Tool handlers keyed by tool name.
    pub tools: HashMap<&'static str, ToolHandler>,
}

impl Registry {
    /// Empty registry; the server fills it in `PolysummMcpServer::new`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the reader for `uri`, replacing any earlier one.
    pub fn register_resource(&mut self, uri: &'static str, handler: ResourceHandler) {
        self.resources.insert(uri, handler);
    }

    /// Register the handler for tool `name`, replacing any earlier one.
    pub fn register_tool(&mut self, name: &'static str, handler: ToolHandler) {
        self.tools.insert(name, handler);
    }
}
