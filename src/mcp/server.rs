//! MCP server bootstrap and request dispatch.

use std::{borrow::Cow, sync::Arc};

use crate::{
    config::get_config,
    mcp::{
        format::{SettingsSnapshot, health_payload, json_resource_contents, serialize_json},
        handlers::{
            languages::handle_languages, metrics::handle_metrics, summarize::handle_summarize,
        },
        registry, schemas,
    },
    processing::SummaryService,
};
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::{
        AnnotateAble, CallToolRequestParam, CallToolResult, ListResourcesResult,
        ListToolsResult, RawResource, ReadResourceRequestParam, ReadResourceResult, Resource,
        ServerCapabilities, ServerInfo, Tool, ToolAnnotations,
    },
};

const HEALTH_URI: &str = "mcp://health";
const SETTINGS_URI: &str = "mcp://settings";

/// MCP server implementation exposing the summarization pipeline.
#[derive(Clone)]
pub struct PolysummMcpServer {
    service: Arc<SummaryService>,
    registry: Arc<registry::Registry>,
}

impl PolysummMcpServer {
    /// Create a new MCP server backed by the supplied summary service.
    pub fn new(service: Arc<SummaryService>) -> Self {
        let mut registry = registry::Registry::new();
        registry.register_resource(HEALTH_URI, resource_health);
        registry.register_resource(SETTINGS_URI, resource_settings);

        registry.register_tool("summarize", tool_summarize);
        registry.register_tool("languages", tool_languages);
        registry.register_tool("metrics", tool_metrics);

        Self {
            service,
            registry: Arc::new(registry),
        }
    }

    fn describe_tools(&self) -> Vec<Tool> {
        vec![
            Tool {
                name: Cow::Borrowed("summarize"),
                title: Some("Summarize Text".to_string()),
                description: Some(Cow::Borrowed(
                    "Produce a cleaned abstractive summary of a document in its own language; pass `language` to skip detection.",
                )),
                input_schema: Arc::new(schemas::summarize_input_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Summarize Text")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(true),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("languages"),
                title: Some("Supported Languages".to_string()),
                description: Some(Cow::Borrowed(
                    "List the Indic and mBART routing sets and the script block enforced per language.",
                )),
                input_schema: Arc::new(schemas::empty_object_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Supported Languages")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(false),
                ),
                icons: None,
            },
            Tool {
                name: Cow::Borrowed("metrics"),
                title: Some("Metrics Snapshot".to_string()),
                description: Some(Cow::Borrowed(
                    "Check summarization volume, backend failures, and last chunk count at a glance.",
                )),
                input_schema: Arc::new(schemas::empty_object_schema()),
                output_schema: None,
                annotations: Some(
                    ToolAnnotations::with_title("Metrics Snapshot")
                        .read_only(true)
                        .idempotent(true)
                        .open_world(false),
                ),
                icons: None,
            },
        ]
    }

    fn describe_resources(&self) -> Vec<Resource> {
        let mut health = RawResource::new(HEALTH_URI, "health");
        health.description = Some("Configured provider and which model families loaded".into());

        let mut settings = RawResource::new(SETTINGS_URI, "settings");
        settings.description =
            Some("Chunk budget, length presets, and decoding parameters in effect".into());

        vec![health.no_annotation(), settings.no_annotation()]
    }
}

fn resource_health(
    server: &PolysummMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    let service = server.service.clone();
    Box::pin(async move {
        let config = get_config();
        let statuses = service.backend_statuses();
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                HEALTH_URI,
                health_payload(config.summarizer_provider, &statuses),
            )],
        })
    })
}

fn resource_settings(
    server: &PolysummMcpServer,
    _request: ReadResourceRequestParam,
) -> registry::ResourceFuture {
    let settings = server.service.settings();
    Box::pin(async move {
        let payload = SettingsSnapshot::from_settings(settings);
        Ok(ReadResourceResult {
            contents: vec![json_resource_contents(
                SETTINGS_URI,
                serialize_json(&payload, SETTINGS_URI),
            )],
        })
    })
}

fn tool_summarize(
    server: &PolysummMcpServer,
    request: CallToolRequestParam,
) -> registry::ToolFuture {
    let service = server.service.clone();
    Box::pin(async move { handle_summarize(&service, request.arguments).await })
}

fn tool_languages(
    _server: &PolysummMcpServer,
    _request: CallToolRequestParam,
) -> registry::ToolFuture {
    Box::pin(handle_languages())
}

fn tool_metrics(
    server: &PolysummMcpServer,
    _request: CallToolRequestParam,
) -> registry::ToolFuture {
    let service = server.service.clone();
    Box::pin(async move { handle_metrics(&service).await })
}

impl ServerHandler for PolysummMcpServer {
    fn get_info(&self) -> ServerInfo {
        let mut implementation = rmcp::model::Implementation::from_build_env();
        implementation.name = "polysumm".to_string();
        implementation.title = Some("Polysumm MCP".to_string());
        implementation.version = env!("CARGO_PKG_VERSION").to_string();

        ServerInfo {
            capabilities: ServerCapabilities::builder()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: implementation,
            instructions: Some(
                "Use this server to summarize documents in Indian and other languages. Send the full text to `summarize`; the summary comes back in the document's own language with model artifacts removed.".into(),
            ),
            ..ServerInfo::default()
        }
    }

    fn list_resources(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        let resources = self.describe_resources();
        std::future::ready(Ok(ListResourcesResult::with_all_items(resources)))
    }

    fn list_tools(
        &self,
        _request: Option<rmcp::model::PaginatedRequestParam>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        let tools = self.describe_tools();
        std::future::ready(Ok(ListToolsResult::with_all_items(tools)))
    }

    #[allow(clippy::manual_async_fn)]
    fn read_resource(
        &self,
        request: ReadResourceRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            if let Some(handler) = self.registry.resources.get(request.uri.as_str()) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown resource URI: {}", request.uri),
                None,
            ))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            if let Some(handler) = self.registry.tools.get(request.name.as_ref()) {
                return handler(self, request).await;
            }

            Err(McpError::invalid_params(
                format!("Unknown tool: {}", request.name),
                None,
            ))
        }
    }
}
