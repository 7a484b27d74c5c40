//! MultiAgentLogger - Hierarchy-aware trace output
//!
//! The logger owns one `SessionTracker` and feeds what it records into a
//! `TraceFormatter`, writing one formatted block per event to its sink.
//!
//! When disabled, every `log_*` call returns immediately: the tracker is
//! not touched and nothing is written.
//!
//! # Example
//!
//! ```
//! use shadow_agent_trace::logging::{LoggerConfig, MultiAgentLogger};
//!
//! let mut logger = MultiAgentLogger::with_writer(LoggerConfig::new().with_color(false), Vec::new());
//! logger.log_session_start("s1", "orchestrator", None);
//! let delegation = logger.log_delegation("s1", "worker", "do X");
//! logger.log_session_start("s2", "worker", Some("s1"));
//! if let Some(id) = delegation {
//!     logger.log_child_linked(&id, "s2");
//! }
//! logger.log_session_complete("s2");
//!
//! let output = String::from_utf8(logger.into_writer()).unwrap();
//! assert!(output.contains("CHILD completed"));
//! ```

use std::io::{self, Stdout, Write};
use std::sync::Arc;

use serde_json::Value;

use super::config::LoggerConfig;
use crate::cli::{Role, TraceFormatter};
use crate::core::Clock;
use crate::tracking::SessionTracker;

/// Tool calls with this name are rendered by `log_delegation` instead
const DELEGATION_TOOL: &str = "task";

/// Multi-agent logger with hierarchy-aware formatting
pub struct MultiAgentLogger<W: Write = Stdout> {
    tracker: SessionTracker,
    formatter: TraceFormatter,
    writer: W,
    enabled: bool,
}

impl MultiAgentLogger<Stdout> {
    /// Create a logger that writes to stdout
    pub fn new(config: LoggerConfig) -> Self {
        Self::with_writer(config, io::stdout())
    }
}

impl Default for MultiAgentLogger<Stdout> {
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

impl<W: Write> MultiAgentLogger<W> {
    /// Create a logger writing to a custom sink
    pub fn with_writer(config: LoggerConfig, writer: W) -> Self {
        Self::with_tracker(config, SessionTracker::new(), writer)
    }

    /// Create a logger whose tracker reads time from `clock`
    pub fn with_clock(config: LoggerConfig, clock: Arc<dyn Clock>, writer: W) -> Self {
        Self::with_tracker(config, SessionTracker::with_clock(clock), writer)
    }

    fn with_tracker(config: LoggerConfig, tracker: SessionTracker, writer: W) -> Self {
        Self {
            tracker,
            formatter: TraceFormatter::new(config.format_options()),
            writer,
            enabled: config.enabled,
        }
    }

    /// Log session start
    pub fn log_session_start(&mut self, session_id: &str, agent: &str, parent_id: Option<&str>) {
        if !self.enabled {
            return;
        }

        self.tracker.register_session(session_id, agent, parent_id);
        let Some(session) = self.tracker.get_session(session_id) else {
            return;
        };

        let line = self
            .formatter
            .session_header(session_id, agent, session.depth, parent_id);
        self.emit(&line);
    }

    /// Log a delegation and return the ID to link its child session with
    ///
    /// Returns `None` when the logger is disabled.
    pub fn log_delegation(&mut self, parent_session_id: &str, to_agent: &str, prompt: &str) -> Option<String> {
        if !self.enabled {
            return None;
        }

        let delegation_id = self
            .tracker
            .record_delegation(parent_session_id, to_agent, prompt);
        let depth = self.depth_of(parent_session_id);

        let line = self.formatter.delegation(to_agent, prompt, depth);
        self.emit(&line);

        Some(delegation_id)
    }

    /// Log a child session being linked to its delegation
    ///
    /// Nothing is printed for an unknown delegation.
    pub fn log_child_linked(&mut self, delegation_id: &str, child_session_id: &str) {
        if !self.enabled {
            return;
        }

        self.tracker.link_child_session(delegation_id, child_session_id);

        let Some(delegation) = self.tracker.get_delegation(delegation_id) else {
            return;
        };
        let depth = self.depth_of(&delegation.parent_session_id);

        let line = self.formatter.child_linked(child_session_id, depth);
        self.emit(&line);
    }

    /// Log a user or assistant message
    pub fn log_message(&mut self, session_id: &str, role: Role, text: &str) {
        if !self.enabled {
            return;
        }

        let depth = self.depth_of(session_id);
        let line = self.formatter.message(role, text, depth);
        self.emit(&line);
    }

    /// Log a tool call
    pub fn log_tool_call(&mut self, session_id: &str, tool: &str, input: &Value) {
        if !self.enabled || tool == DELEGATION_TOOL {
            return;
        }

        let depth = self.depth_of(session_id);
        let line = self.formatter.tool_call(tool, input, depth);
        self.emit(&line);
    }

    /// Log session completion
    ///
    /// Nothing is recorded or printed for an unknown session.
    pub fn log_session_complete(&mut self, session_id: &str) {
        if !self.enabled || self.tracker.get_session(session_id).is_none() {
            return;
        }

        self.tracker.complete_session(session_id);

        let (Some(session), Some(duration)) = (
            self.tracker.get_session(session_id),
            self.tracker.duration(session_id),
        ) else {
            return;
        };

        let line = self
            .formatter
            .session_complete(session.session_type(), duration, session.depth);
        self.emit(&line);
    }

    /// Log a system message
    pub fn log_system(&mut self, session_id: &str, message: &str) {
        if !self.enabled {
            return;
        }

        let depth = self.depth_of(session_id);
        let line = self.formatter.system(message, depth);
        self.emit(&line);
    }

    /// Get the session tracker for analysis
    pub fn tracker(&self) -> &SessionTracker {
        &self.tracker
    }

    /// Enable or disable logging
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Clear all tracked data
    pub fn clear(&mut self) {
        self.tracker.clear();
    }

    /// Get the output sink
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Consume the logger and return its output sink
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Depth of a session, 0 when unknown
    fn depth_of(&self, session_id: &str) -> usize {
        self.tracker
            .get_session(session_id)
            .map(|s| s.depth)
            .unwrap_or(0)
    }

    fn emit(&mut self, text: &str) {
        if let Err(e) = writeln!(self.writer, "{}", text).and_then(|_| self.writer.flush()) {
            tracing::warn!("Failed to write trace output: {}", e);
        }
    }
}

impl<W: Write> std::fmt::Debug for MultiAgentLogger<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiAgentLogger")
            .field("enabled", &self.enabled)
            .field("tracker", &self.tracker)
            .finish()
    }
}
