//! Delegation records
//!
//! A delegation is created when a session asks for a sub-task, before the
//! child session exists. It is linked to the child later, or never.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One request by a session to spawn a child agent task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delegation {
    /// Tracker-generated ID
    pub delegation_id: String,

    /// The delegating session (need not be registered)
    pub parent_session_id: String,

    /// Target agent name
    pub to_agent: String,

    /// Task text handed to the child
    pub prompt: String,

    /// Session spawned for this delegation, once linked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_session_id: Option<String>,

    /// When the delegation was recorded
    pub created_at: DateTime<Utc>,
}

impl Delegation {
    pub(crate) fn new(
        delegation_id: String,
        parent_session_id: impl Into<String>,
        to_agent: impl Into<String>,
        prompt: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            delegation_id,
            parent_session_id: parent_session_id.into(),
            to_agent: to_agent.into(),
            prompt: prompt.into(),
            child_session_id: None,
            created_at,
        }
    }

    /// Check if a child session has been linked
    pub fn is_linked(&self) -> bool {
        self.child_session_id.is_some()
    }

    /// Linked child session ID
    pub fn child_session_id(&self) -> Option<&str> {
        self.child_session_id.as_deref()
    }
}
