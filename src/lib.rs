#![deny(missing_docs)]

//! Core library for the Polysumm multilingual summarization service.

/// HTTP routing and REST handlers.
pub mod api;
/// Environment-driven configuration management.
pub mod config;
/// Text extraction from uploaded PDF, DOCX, and plain-text files.
pub mod extract;
/// Language codes, script tables, and script-based detection.
pub mod language;
/// Structured logging and tracing setup.
pub mod logging;
/// Model Context Protocol server implementation.
pub mod mcp;
/// Summarization metrics helpers.
pub mod metrics;
/// Chunking, cleanup, and the summarization pipeline.
pub mod processing;
/// Summarization backends and model routing.
pub mod summarization;
