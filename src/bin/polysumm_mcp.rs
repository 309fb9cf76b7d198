//! MCP server entrypoint (stdio transport).
//!
//! Launches an MCP server that exposes Polysumm's summarization tools and resources over stdio.
//! Logs go to stderr so they never interleave with protocol frames on stdout. Runtime
//! configuration is shared with the HTTP binary.
use anyhow::{Context, Result};
use polysumm::{config, logging, mcp::PolysummMcpServer, processing::SummaryService};
use rmcp::{service::ServiceExt, transport::stdio};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    config::init_config();
    logging::init_tracing_stderr();

    let service = SummaryService::from_config(config::get_config())
        .context("failed to initialize summarization backends")?;
    let server = PolysummMcpServer::new(Arc::new(service));

    let running = server
        .serve(stdio())
        .await
        .context("failed to start MCP server over stdio")?;

    running
        .waiting()
        .await
        .context("MCP server terminated unexpectedly")?;

    Ok(())
}
