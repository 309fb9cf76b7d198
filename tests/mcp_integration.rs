use std::sync::Arc;

use httpmock::{Method::POST, Mock, MockServer};
use regex::Regex;
use rmcp::{
    handler::client::ClientHandler,
    model::{
        self, CallToolRequestParam, ClientInfo, PaginatedRequestParam, ReadResourceRequestParam,
        ResourceContents,
    },
    service::{RoleClient, RoleServer, RunningService, Service, serve_directly},
    transport::async_rw::AsyncRwTransport,
};
use polysumm::{config, logging, mcp::PolysummMcpServer, processing::SummaryService};
use serde_json::{Value, json};
use tokio::{io::split, sync::OnceCell};

static INIT: OnceCell<()> = OnceCell::const_new();
static MOCK_SERVER: OnceCell<&'static MockServer> = OnceCell::const_new();
static MOCK_HANDLES: OnceCell<Vec<Mock<'static>>> = OnceCell::const_new();

const MODEL_OUTPUT: &str = "Transit systems expand quickly. Transit systems expand quickly. \
     The riders riders riders riders praise the new lines <extra_id_0>.";

fn set_env(key: &str, value: &str) {
    // SAFETY: Tests run in a single process and establish deterministic configuration upfront.
    unsafe { std::env::set_var(key, value) }
}

#[derive(Clone, Default)]
struct DummyClientHandler;

impl ClientHandler for DummyClientHandler {
    fn get_info(&self) -> ClientInfo {
        ClientInfo::default()
    }
}

struct TestHarness {
    service: RunningService<RoleClient, DummyClientHandler>,
    server: RunningService<RoleServer, PolysummMcpServer>,
}

impl TestHarness {
    async fn new() -> Self {
        INIT.get_or_init(|| async {
            let mock_server_owned = MockServer::start_async().await;
            let mock_server = Box::leak(Box::new(mock_server_owned));
            let base_url = mock_server.base_url();

            set_env("SUMMARIZER_PROVIDER", "huggingface");
            set_env("HF_API_URL", &base_url);
            set_env("DISABLED_MODELS", "mt5");
            set_env("CHUNK_MAX_CHARS", "200");

            MOCK_SERVER.set(mock_server).ok();

            let server = MOCK_SERVER.get().expect("mock server initialized");
            let models_regex = Regex::new(r"^/models/").unwrap();

            let mocks: Vec<Mock<'static>> = vec![
                server
                    .mock_async({
                        let models_regex = models_regex.clone();
                        move |when, then| {
                            when.method(POST).path_matches(models_regex.clone());
                            then.status(200)
                                .json_body(json!([{ "summary_text": MODEL_OUTPUT }]));
                        }
                    })
                    .await,
            ];

            MOCK_HANDLES.set(mocks).ok();

            config::init_config();
            logging::init_tracing_stderr();
        })
        .await;

        let summaries = SummaryService::from_config(config::get_config())
            .expect("summary service should initialize");
        let server = PolysummMcpServer::new(Arc::new(summaries));

        let (client_stream, server_stream) = tokio::io::duplex(16 * 1024);
        let (client_read, client_write) = split(client_stream);
        let (server_read, server_write) = split(server_stream);

        let client_transport = AsyncRwTransport::new_client(client_read, client_write);
        let server_transport = AsyncRwTransport::new_server(server_read, server_write);

        let server_info = server.get_info();
        let client_handler = DummyClientHandler;
        let client_info = ClientHandler::get_info(&client_handler);

        let server =
            serve_directly::<RoleServer, _, _, _, _>(server, server_transport, Some(client_info));

        let service = serve_directly::<RoleClient, _, _, _, _>(
            client_handler,
            client_transport,
            Some(server_info),
        );

        Self { service, server }
    }

    async fn shutdown(self) {
        let Self { service, server } = self;
        let _ = service.cancel().await;
        let _ = server.cancel().await;
    }
}

fn arguments(value: Value) -> Option<model::JsonObject> {
    Some(value.as_object().unwrap().clone())
}

fn resource_json(contents: &[ResourceContents]) -> Value {
    match contents.first().expect("resource contents") {
        ResourceContents::TextResourceContents { text, .. } => {
            serde_json::from_str(text).expect("resource body is JSON")
        }
        other => panic!("expected text contents, got {other:?}"),
    }
}

#[tokio::test]
async fn initialize_and_list_tools() {
    let harness = TestHarness::new().await;
    let service = &harness.service;

    let info = service
        .peer_info()
        .expect("server info should be initialized");
    assert_eq!(info.server_info.name, "polysumm");
    assert!(info.capabilities.tools.is_some());
    assert!(info.capabilities.resources.is_some());

    let tools_result = service
        .list_tools(Some(PaginatedRequestParam { cursor: None }))
        .await
        .expect("list_tools");

    let names: Vec<_> = tools_result
        .tools
        .iter()
        .map(|tool| tool.name.as_ref())
        .collect();

    assert!(names.contains(&"summarize"));
    assert!(names.contains(&"languages"));
    assert!(names.contains(&"metrics"));

    harness.shutdown().await;
}

#[tokio::test]
async fn summarize_tool_returns_cleaned_summary() {
    let harness = TestHarness::new().await;
    let service = &harness.service;

    let text = "The city opened three new metro lines this year. \
        Ridership doubled within weeks as commuters left their cars at home. \
        Officials expect further growth once the airport link opens next spring. \
        Critics argue that fares remain too high for many workers.";

    let response = service
        .call_tool(CallToolRequestParam {
            name: "summarize".into(),
            arguments: arguments(json!({ "text": text, "length": "short" })),
        })
        .await
        .expect("summarize tool call");

    assert_eq!(response.is_error, Some(false));
    let payload = response.structured_content.expect("structured payload");
    assert_eq!(payload["source"], "textarea");
    assert_eq!(payload["detectedLanguage"], "en");
    assert_eq!(payload["modelUsed"], "mbart");
    assert_eq!(payload["summaryLength"], "short");
    assert!(payload["chunkCount"].as_u64().unwrap_or(0) >= 2);

    let summary = payload["summary"].as_str().expect("summary text");
    assert!(!summary.contains("<extra_id"), "artifact left in {summary:?}");
    assert_eq!(summary.matches("Transit systems expand quickly").count(), 1);
    assert!(!summary.contains("riders riders"), "repeat left in {summary:?}");

    let metrics_response = service
        .call_tool(CallToolRequestParam {
            name: "metrics".into(),
            arguments: arguments(json!({})),
        })
        .await
        .expect("metrics tool call");
    assert_eq!(metrics_response.is_error, Some(false));
    let metrics_payload = metrics_response
        .structured_content
        .expect("structured metrics payload");
    assert_eq!(metrics_payload["requestsSummarized"], 1);
    assert_eq!(metrics_payload["lastChunkCount"], payload["chunkCount"]);

    harness.shutdown().await;
}

#[tokio::test]
async fn languages_tool_lists_routing_sets() {
    let harness = TestHarness::new().await;

    let response = harness
        .service
        .call_tool(CallToolRequestParam {
            name: "languages".into(),
            arguments: None,
        })
        .await
        .expect("languages tool call");

    let payload = response.structured_content.expect("structured payload");
    let indic = payload["indic"].as_array().expect("indic list");
    assert!(indic.iter().any(|code| code == "te"));
    let scripts = payload["scripts"].as_array().expect("script table");
    assert!(scripts.iter().any(|entry| entry["language"] == "hi"));

    harness.shutdown().await;
}

#[tokio::test]
async fn resources_report_health_and_settings() {
    let harness = TestHarness::new().await;
    let service = &harness.service;

    let health = service
        .read_resource(ReadResourceRequestParam {
            uri: "mcp://health".into(),
        })
        .await
        .expect("health resource");
    let health = resource_json(&health.contents);
    assert_eq!(health["provider"], "huggingface");
    // mT5 is disabled in the harness environment.
    assert_eq!(health["status"], "degraded");

    let settings = service
        .read_resource(ReadResourceRequestParam {
            uri: "mcp://settings".into(),
        })
        .await
        .expect("settings resource");
    let settings = resource_json(&settings.contents);
    assert_eq!(settings["chunk_max_chars"], 200);

    let err = service
        .read_resource(ReadResourceRequestParam {
            uri: "mcp://unknown".into(),
        })
        .await
        .expect_err("unknown resource");
    match err {
        rmcp::service::ServiceError::McpError(data) => {
            assert_eq!(data.code, model::ErrorCode::INVALID_PARAMS);
        }
        other => panic!("expected MCP error, got {other:?}"),
    }

    harness.shutdown().await;
}

#[tokio::test]
async fn invalid_payload_returns_error() {
    let harness = TestHarness::new().await;
    let service = &harness.service;

    let err = service
        .call_tool(CallToolRequestParam {
            name: "summarize".into(),
            arguments: arguments(json!({ "text": "" })),
        })
        .await
        .expect_err("summarize should fail");

    match err {
        rmcp::service::ServiceError::McpError(data) => {
            assert_eq!(data.code, model::ErrorCode::INVALID_PARAMS);
        }
        other => panic!("expected MCP error, got {other:?}"),
    }

    harness.shutdown().await;
}
