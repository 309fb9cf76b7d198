//! Tracing configuration and log routing.
//!
//! The service logs to stdout using a compact formatter and to a file. When
//! `POLYSUMM_LOG_FILE` is set, logs are appended to that path; otherwise they go to
//! `logs/polysumm.log`. The file writer is non-blocking so slow disks never stall a request.
//!
//! The MCP binary speaks JSON-RPC over stdout, so it installs [`init_tracing_stderr`] instead.
use std::sync::OnceLock;

use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

const LOG_FILE_ENV: &str = "POLYSUMM_LOG_FILE";
const LOG_DIR: &str = "logs";
const LOG_FILE_NAME: &str = "polysumm.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Configure tracing subscribers for stdout and file logging.
///
/// - Respects `RUST_LOG` for filtering (defaults to `info`).
/// - Installs a compact stdout layer and, when the log file opens, a file layer.
/// - Keeps the non-blocking writer alive for the process lifetime through a global guard.
pub fn init_tracing() {
    let stdout_layer = fmt::layer().with_target(false).compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter())
        .with(stdout_layer);

    if let Some(writer) = configure_file_writer() {
        registry.with(file_layer(writer)).init();
    } else {
        registry.init();
    }
}

/// Same as [`init_tracing`] but with the console layer on stderr, leaving stdout free.
pub fn init_tracing_stderr() {
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(false)
        .compact();

    let registry = tracing_subscriber::registry()
        .with(env_filter())
        .with(stderr_layer);

    if let Some(writer) = configure_file_writer() {
        registry.with(file_layer(writer)).init();
    } else {
        registry.init();
    }
}

fn file_layer<S>(writer: NonBlocking) -> impl tracing_subscriber::Layer<S>
where
    S: tracing::Subscriber + for<'span> tracing_subscriber::registry::LookupSpan<'span>,
{
    fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_ansi(false)
        .compact()
}

/// Build a non-blocking writer for file logging.
///
/// Returns `None` when the logs directory cannot be created or the target file cannot be opened.
fn configure_file_writer() -> Option<NonBlocking> {
    if let Ok(path) = std::env::var(LOG_FILE_ENV) {
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            Ok(file) => {
                let (non_blocking, guard) = tracing_appender::non_blocking(file);
                let _ = LOG_GUARD.set(guard);
                Some(non_blocking)
            }
            Err(err) => {
                eprintln!("Failed to open log file {path}: {err}");
                None
            }
        }
    } else {
        if let Err(err) = std::fs::create_dir_all(LOG_DIR) {
            eprintln!("Failed to create logs directory: {err}");
            return None;
        }
        let file_appender = tracing_appender::rolling::never(LOG_DIR, LOG_FILE_NAME);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let _ = LOG_GUARD.set(guard);
        Some(non_blocking)
    }
}
