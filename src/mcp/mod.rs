//! Model Context Protocol (MCP) integration for Polysumm.
//!
//! This module wires the summarization service into an MCP server so editors and agent hosts can
//! summarize documents over stdio. The surface area consists of:
//!
//! - Tools: `summarize`, `languages`, and `metrics`.
//! - Resources: `mcp://health` and `mcp://settings`.
//!
//! Handlers, schemas, and formatting helpers are kept in focused submodules to make tests and
//! reviews small and targeted.

mod format;
pub mod handlers;
mod registry;
mod schemas;
mod server;

pub use server::PolysummMcpServer;
