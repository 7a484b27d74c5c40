//! Trace logging and diagnostics
//!
//! - `MultiAgentLogger` - Renders a hierarchy-aware trace of a multi-agent run
//! - `LoggerConfig` - Options for the logger (enablement, colors, layout)
//! - `init_logging` / `init_file_logging` - Diagnostic `tracing` output
//!
//! Trace output goes to the logger's sink (stdout by default). Diagnostics
//! go to stderr or a log file so they never interleave with the trace.

pub mod config;
pub mod logger;

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

pub use config::LoggerConfig;
pub use logger::MultiAgentLogger;

use crate::core::{TraceError, TraceResult};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "shadow_agent_trace=warn";

/// Log file name used by `init_file_logging`
pub const LOG_FILE_NAME: &str = "shadow-agent-trace.log";

/// Output format for diagnostic logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a global subscriber writing diagnostics to stderr
pub fn init_logging(format: LogFormat) -> TraceResult<()> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| TraceError::invalid_config(format!("Failed to initialize logging: {}", e)))
}

/// Install a global subscriber writing diagnostics to a file in `dir`
///
/// The returned guard flushes pending lines when dropped; keep it alive
/// for the lifetime of the program.
pub fn init_file_logging(dir: impl AsRef<Path>, format: LogFormat) -> TraceResult<WorkerGuard> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(writer);

    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| TraceError::invalid_config(format!("Failed to initialize logging: {}", e)))?;

    tracing::info!("Diagnostic log file: {:?}", dir.join(LOG_FILE_NAME));
    Ok(guard)
}
