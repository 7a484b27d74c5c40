//! Replayer - Drives a `MultiAgentLogger` from a stream of trace events

use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::sync::Arc;

use super::event::{TimedEvent, TraceEvent};
use crate::core::{ManualClock, TraceError, TraceResult};
use crate::logging::{LoggerConfig, MultiAgentLogger};

/// Feeds events into a logger in stream order
///
/// Delegation IDs are generated by the tracker, so a recorded stream cannot
/// know them in advance. A `delegation` event may carry a `key`; later
/// `child_linked` events that name that key are linked to the generated ID.
pub struct Replayer<W: Write> {
    logger: MultiAgentLogger<W>,

    /// Recorded delegation keys mapped to tracker delegation IDs
    delegation_keys: HashMap<String, String>,

    /// Set from event timestamps when replaying in recorded time
    clock: Option<Arc<ManualClock>>,
}

impl<W: Write> Replayer<W> {
    /// Replay against the logger's own clock (live streams)
    pub fn new(logger: MultiAgentLogger<W>) -> Self {
        Self {
            logger,
            delegation_keys: HashMap::new(),
            clock: None,
        }
    }

    /// Replay with session times taken from each event's `timestamp`
    ///
    /// Events without a timestamp happen at the time of the previous event.
    pub fn with_recorded_time(config: LoggerConfig, writer: W) -> Self {
        let clock = Arc::new(ManualClock::default());
        let logger = MultiAgentLogger::with_clock(config, clock.clone(), writer);
        Self {
            logger,
            delegation_keys: HashMap::new(),
            clock: Some(clock),
        }
    }

    /// Apply one event
    pub fn apply(&mut self, timed: TimedEvent) {
        if let (Some(clock), Some(timestamp)) = (&self.clock, timed.timestamp) {
            clock.set(timestamp);
        }

        match timed.event {
            TraceEvent::SessionStart {
                session_id,
                agent,
                parent_id,
            } => {
                self.logger
                    .log_session_start(&session_id, &agent, parent_id.as_deref());
            }
            TraceEvent::Delegation {
                parent_session_id,
                to_agent,
                prompt,
                key,
            } => {
                let delegation_id = self
                    .logger
                    .log_delegation(&parent_session_id, &to_agent, &prompt);
                if let (Some(key), Some(id)) = (key, delegation_id) {
                    self.delegation_keys.insert(key, id);
                }
            }
            TraceEvent::ChildLinked {
                delegation,
                child_session_id,
            } => {
                let delegation_id = self.resolve_delegation(&delegation).to_string();
                self.logger.log_child_linked(&delegation_id, &child_session_id);
            }
            TraceEvent::Message {
                session_id,
                role,
                text,
            } => {
                self.logger.log_message(&session_id, role, &text);
            }
            TraceEvent::ToolCall {
                session_id,
                tool,
                input,
            } => {
                self.logger.log_tool_call(&session_id, &tool, &input);
            }
            TraceEvent::SessionComplete { session_id } => {
                self.logger.log_session_complete(&session_id);
            }
            TraceEvent::System {
                session_id,
                message,
            } => {
                self.logger.log_system(&session_id, &message);
            }
        }
    }

    /// Replay a JSON Lines stream, returning the number of events applied
    ///
    /// Blank lines and lines starting with `#` are skipped. Reading stops at
    /// the first line that is not a valid event.
    pub fn replay_reader<R: BufRead>(&mut self, reader: R) -> TraceResult<usize> {
        let mut applied = 0;

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let event: TimedEvent = serde_json::from_str(trimmed)
                .map_err(|e| TraceError::invalid_event(index + 1, e.to_string()))?;
            self.apply(event);
            applied += 1;
        }

        tracing::debug!("[Replayer] Applied {} events", applied);
        Ok(applied)
    }

    /// Tracker ID for a recorded key, or the input itself when no key matches
    fn resolve_delegation<'a>(&'a self, delegation: &'a str) -> &'a str {
        self.delegation_keys
            .get(delegation)
            .map(String::as_str)
            .unwrap_or(delegation)
    }

    /// Get the underlying logger
    pub fn logger(&self) -> &MultiAgentLogger<W> {
        &self.logger
    }

    /// Consume the replayer and return its logger
    pub fn into_logger(self) -> MultiAgentLogger<W> {
        self.logger
    }
}
