//! Logger Configuration
//!
//! Configuration options for the `MultiAgentLogger`.

use crate::cli::FormatOptions;
use crate::core::{TraceError, TraceResult};

/// Configuration for a MultiAgentLogger
///
/// Use the builder pattern to configure the logger:
///
/// ```
/// use shadow_agent_trace::logging::LoggerConfig;
///
/// let config = LoggerConfig::new()
///     .with_color(false)
///     .with_indent_width(4)
///     .with_preview_chars(60);
/// assert!(config.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Whether tracking and output happen at all
    pub enabled: bool,

    /// Whether to emit ANSI colors
    pub color: bool,

    /// Spaces per depth level
    pub indent_width: usize,

    /// Maximum characters shown for prompts and tool inputs
    pub preview_chars: usize,
}

impl LoggerConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self {
            enabled: true,
            color: true,
            indent_width: 2,
            preview_chars: 100,
        }
    }

    /// Load configuration from the environment
    ///
    /// - `AGENT_TRACE_ENABLED`: `0`, `false`, `off` or `no` disables the logger
    /// - `NO_COLOR`: any non-empty value disables colors
    /// - `AGENT_TRACE_INDENT`: spaces per depth level
    /// - `AGENT_TRACE_PREVIEW`: preview length in characters
    pub fn from_env() -> TraceResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> TraceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(value) = lookup("AGENT_TRACE_ENABLED") {
            config.enabled = !matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "off" | "no"
            );
        }
        if lookup("NO_COLOR").is_some_and(|v| !v.is_empty()) {
            config.color = false;
        }
        if let Some(value) = lookup("AGENT_TRACE_INDENT") {
            config.indent_width = parse_count("AGENT_TRACE_INDENT", &value)?;
        }
        if let Some(value) = lookup("AGENT_TRACE_PREVIEW") {
            config.preview_chars = parse_count("AGENT_TRACE_PREVIEW", &value)?;
        }

        tracing::debug!("Logger configuration: {:?}", config);
        Ok(config)
    }

    /// Enable or disable the logger
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Enable or disable colors
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Set spaces per depth level
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set the preview length for prompts and tool inputs
    pub fn with_preview_chars(mut self, chars: usize) -> Self {
        self.preview_chars = chars;
        self
    }

    /// Formatter options derived from this configuration
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            color: self.color,
            indent_width: self.indent_width,
            preview_chars: self.preview_chars,
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_count(key: &str, value: &str) -> TraceResult<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| TraceError::invalid_config(format!("{} must be a non-negative integer, got {:?}", key, value)))
}
