//! Trace events as they appear in a JSON Lines stream
//!
//! ```text
//! {"type":"session_start","session_id":"s1","agent":"orchestrator"}
//! {"type":"delegation","parent_session_id":"s1","to_agent":"worker","prompt":"do X","key":"d1"}
//! {"type":"session_start","session_id":"s2","agent":"worker","parent_id":"s1"}
//! {"type":"child_linked","delegation":"d1","child_session_id":"s2"}
//! {"type":"session_complete","session_id":"s2","timestamp":"2024-05-01T12:00:03Z"}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cli::Role;

/// One event, with the optional time it was recorded at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub event: TraceEvent,
}

/// Application-level events driving the logger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    /// A session started
    SessionStart {
        session_id: String,
        agent: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent_id: Option<String>,
    },

    /// A session asked for a sub-task
    Delegation {
        parent_session_id: String,
        to_agent: String,
        prompt: String,
        /// Name later `child_linked` events use to refer to this delegation
        #[serde(default, skip_serializing_if = "Option::is_none")]
        key: Option<String>,
    },

    /// The session spawned for a delegation exists
    ChildLinked {
        /// A `key` from an earlier delegation, or a tracker delegation ID
        delegation: String,
        child_session_id: String,
    },

    /// A user or assistant message
    Message {
        session_id: String,
        role: Role,
        text: String,
    },

    /// A tool invocation
    ToolCall {
        session_id: String,
        tool: String,
        #[serde(default)]
        input: Value,
    },

    /// A session finished
    SessionComplete { session_id: String },

    /// Informational message from the harness
    System { session_id: String, message: String },
}
