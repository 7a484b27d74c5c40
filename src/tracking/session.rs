//! Tracked session records

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Whether a session has finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Running,
    Completed,
}

/// Position of a session in the delegation hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionType {
    /// Depth 0: no known delegating session
    Parent,
    /// Depth 1 or more
    Child,
}

impl SessionType {
    /// Classify a session by depth
    pub fn from_depth(depth: usize) -> Self {
        if depth == 0 {
            SessionType::Parent
        } else {
            SessionType::Child
        }
    }

    /// Display label (`PARENT` / `CHILD`)
    pub fn label(&self) -> &'static str {
        match self {
            SessionType::Parent => "PARENT",
            SessionType::Child => "CHILD",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One agent run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    // --- Identity ---
    /// Caller-supplied session ID
    pub session_id: String,

    /// Type of agent running in this session (e.g., "orchestrator", "worker")
    pub agent: String,

    // --- Lineage ---
    /// Session that delegated to this one, as supplied at registration
    ///
    /// Kept even when the parent was never registered; `depth` is what
    /// reflects whether the parent was actually known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    /// Distance from the root: 0 without a known parent, else parent depth + 1
    pub depth: usize,

    // --- Timestamps ---
    /// When the session was registered
    pub start_time: DateTime<Utc>,

    /// When the session completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl Session {
    pub(crate) fn new(
        session_id: impl Into<String>,
        agent: impl Into<String>,
        parent_id: Option<String>,
        depth: usize,
        start_time: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: session_id.into(),
            agent: agent.into(),
            parent_id,
            depth,
            start_time,
            end_time: None,
        }
    }

    /// Running until an end time is recorded
    pub fn status(&self) -> SessionStatus {
        if self.end_time.is_some() {
            SessionStatus::Completed
        } else {
            SessionStatus::Running
        }
    }

    /// Check if the session has completed
    pub fn is_completed(&self) -> bool {
        self.end_time.is_some()
    }

    /// `PARENT` at depth 0, `CHILD` otherwise
    pub fn session_type(&self) -> SessionType {
        SessionType::from_depth(self.depth)
    }

    /// Check if this session sits at the root of a hierarchy
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// Elapsed time: `end - start` once completed, otherwise `now - start`
    pub fn duration_at(&self, now: DateTime<Utc>) -> Duration {
        self.end_time.unwrap_or(now) - self.start_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_root_session() {
        let session = Session::new("s1", "orchestrator", None, 0, start());

        assert!(session.is_root());
        assert_eq!(session.session_type(), SessionType::Parent);
        assert_eq!(session.status(), SessionStatus::Running);
        assert!(!session.is_completed());
    }

    #[test]
    fn test_child_session_type() {
        let session = Session::new("s2", "worker", Some("s1".into()), 1, start());

        assert!(!session.is_root());
        assert_eq!(session.session_type(), SessionType::Child);
        assert_eq!(session.session_type().to_string(), "CHILD");
    }

    #[test]
    fn test_duration_running_uses_now() {
        let session = Session::new("s1", "orchestrator", None, 0, start());
        let now = start() + Duration::seconds(7);

        assert_eq!(session.duration_at(now), Duration::seconds(7));
    }

    #[test]
    fn test_duration_completed_ignores_now() {
        let mut session = Session::new("s1", "orchestrator", None, 0, start());
        session.end_time = Some(start() + Duration::milliseconds(2500));

        let much_later = start() + Duration::hours(1);
        assert_eq!(session.status(), SessionStatus::Completed);
        assert_eq!(session.duration_at(much_later), Duration::milliseconds(2500));
    }

    #[test]
    fn test_serialization_skips_unset_fields() {
        let session = Session::new("s1", "orchestrator", None, 0, start());
        let json = serde_json::to_string(&session).unwrap();

        assert!(!json.contains("parent_id"));
        assert!(!json.contains("end_time"));

        let loaded: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, session);
    }
}
