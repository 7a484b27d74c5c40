//! SessionTracker - Tracks the session hierarchy of a multi-agent run
//!
//! The `SessionTracker` is owned by exactly one logger and provides:
//! - Registration of sessions, with depth derived from the parent session
//! - Two-phase delegation tracking: record the request, link the child later
//! - Completion timestamps for duration reporting
//!
//! Every call is synchronous and infallible. Lookups of unknown IDs return
//! `None`; mutations of unknown IDs do nothing.
//!
//! # Example
//!
//! ```
//! use shadow_agent_trace::tracking::SessionTracker;
//!
//! let mut tracker = SessionTracker::new();
//! tracker.register_session("s1", "orchestrator", None);
//! let delegation_id = tracker.record_delegation("s1", "worker", "do X");
//! tracker.register_session("s2", "worker", Some("s1"));
//! tracker.link_child_session(&delegation_id, "s2");
//!
//! assert_eq!(tracker.get_session("s2").map(|s| s.depth), Some(1));
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::delegation::Delegation;
use super::session::Session;
use crate::core::{Clock, SystemClock};

/// Tracks sessions and delegations for a single event stream
pub struct SessionTracker {
    /// Sessions keyed by session ID
    sessions: HashMap<String, Session>,

    /// Delegations keyed by delegation ID
    delegations: HashMap<String, Delegation>,

    /// Prefix unique to this tracker instance
    namespace: String,

    /// Next delegation sequence number (survives `clear`)
    next_sequence: u64,

    clock: Arc<dyn Clock>,
}

/// Point-in-time copy of everything a tracker holds
///
/// Sessions are ordered by start time, delegations by creation time, with
/// IDs breaking ties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    pub sessions: Vec<Session>,
    pub delegations: Vec<Delegation>,
}

impl SessionTracker {
    /// Create an empty tracker on the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty tracker on a custom clock
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let namespace = Uuid::new_v4().simple().to_string()[..8].to_string();
        Self {
            sessions: HashMap::new(),
            delegations: HashMap::new(),
            namespace,
            next_sequence: 1,
            clock,
        }
    }

    /// The clock this tracker reads timestamps from
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    // --- Sessions ---

    /// Register a session
    ///
    /// Depth is `parent.depth + 1` when `parent_id` names a registered
    /// session and 0 otherwise. Registering an existing ID replaces the
    /// previous record.
    pub fn register_session(&mut self, session_id: &str, agent: &str, parent_id: Option<&str>) {
        let depth = parent_id
            .and_then(|id| self.sessions.get(id))
            .map(|parent| parent.depth + 1)
            .unwrap_or(0);

        let session = Session::new(
            session_id,
            agent,
            parent_id.map(str::to_string),
            depth,
            self.clock.now(),
        );

        tracing::debug!(
            "[SessionTracker] Registering session: {} (agent={}, depth={})",
            session_id,
            agent,
            depth
        );

        if self.sessions.insert(session_id.to_string(), session).is_some() {
            tracing::debug!("[SessionTracker] Session {} re-registered, previous record replaced", session_id);
        }
    }

    /// Get a session by ID
    pub fn get_session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    /// Mark a session as completed
    ///
    /// Unknown IDs are ignored. A second call moves the end time. The end
    /// time never precedes the start time, even if the clock went backwards.
    pub fn complete_session(&mut self, session_id: &str) {
        let now = self.clock.now();
        match self.sessions.get_mut(session_id) {
            Some(session) => {
                session.end_time = Some(now.max(session.start_time));
                tracing::debug!("[SessionTracker] Session {} completed", session_id);
            }
            None => {
                tracing::debug!("[SessionTracker] Ignoring completion of unknown session: {}", session_id);
            }
        }
    }

    /// Elapsed time of a session, measured against this tracker's clock
    pub fn duration(&self, session_id: &str) -> Option<Duration> {
        self.sessions
            .get(session_id)
            .map(|session| session.duration_at(self.clock.now()))
    }

    /// Direct children of a session, ordered by start time
    pub fn children_of(&self, session_id: &str) -> Vec<&Session> {
        let mut children: Vec<&Session> = self
            .sessions
            .values()
            .filter(|s| s.parent_id.as_deref() == Some(session_id))
            .collect();
        children.sort_by(|a, b| {
            a.start_time
                .cmp(&b.start_time)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });
        children
    }

    // --- Delegations ---

    /// Record a delegation and return its freshly generated ID
    ///
    /// `parent_session_id` does not have to be registered.
    pub fn record_delegation(&mut self, parent_session_id: &str, to_agent: &str, prompt: &str) -> String {
        let delegation_id = format!("{}-{}", self.namespace, self.next_sequence);
        self.next_sequence += 1;

        let delegation = Delegation::new(
            delegation_id.clone(),
            parent_session_id,
            to_agent,
            prompt,
            self.clock.now(),
        );

        tracing::debug!(
            "[SessionTracker] Recorded delegation {}: {} -> {}",
            delegation_id,
            parent_session_id,
            to_agent
        );

        self.delegations.insert(delegation_id.clone(), delegation);
        delegation_id
    }

    /// Get a delegation by ID
    pub fn get_delegation(&self, delegation_id: &str) -> Option<&Delegation> {
        self.delegations.get(delegation_id)
    }

    /// Attach the child session spawned for a delegation
    ///
    /// Unknown delegation IDs are ignored and nothing is created. Linking
    /// twice keeps the last child.
    pub fn link_child_session(&mut self, delegation_id: &str, child_session_id: &str) {
        match self.delegations.get_mut(delegation_id) {
            Some(delegation) => {
                delegation.child_session_id = Some(child_session_id.to_string());
                tracing::debug!(
                    "[SessionTracker] Linked delegation {} to session {}",
                    delegation_id,
                    child_session_id
                );
            }
            None => {
                tracing::debug!(
                    "[SessionTracker] Ignoring link for unknown delegation: {}",
                    delegation_id
                );
            }
        }
    }

    /// Delegations made by a session, ordered by creation
    pub fn delegations_from(&self, parent_session_id: &str) -> Vec<&Delegation> {
        let mut delegations: Vec<&Delegation> = self
            .delegations
            .values()
            .filter(|d| d.parent_session_id == parent_session_id)
            .collect();
        sort_delegations(&mut delegations);
        delegations
    }

    // --- Inspection ---

    /// All sessions, in no particular order
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    /// All delegations, in no particular order
    pub fn delegations(&self) -> impl Iterator<Item = &Delegation> {
        self.delegations.values()
    }

    /// Number of tracked sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Number of tracked delegations
    pub fn delegation_count(&self) -> usize {
        self.delegations.len()
    }

    /// Check if nothing is tracked
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty() && self.delegations.is_empty()
    }

    /// Copy the tracked structure in a stable order
    pub fn snapshot(&self) -> TrackerSnapshot {
        let mut sessions: Vec<&Session> = self.sessions.values().collect();
        sessions.sort_by(|a, b| {
            a.start_time
                .cmp(&b.start_time)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });

        let mut delegations: Vec<&Delegation> = self.delegations.values().collect();
        sort_delegations(&mut delegations);

        TrackerSnapshot {
            sessions: sessions.into_iter().cloned().collect(),
            delegations: delegations.into_iter().cloned().collect(),
        }
    }

    /// Forget all sessions and delegations
    ///
    /// Delegation IDs handed out before the clear are never reissued.
    pub fn clear(&mut self) {
        tracing::debug!(
            "[SessionTracker] Clearing {} sessions and {} delegations",
            self.sessions.len(),
            self.delegations.len()
        );
        self.sessions.clear();
        self.delegations.clear();
    }
}

fn sort_delegations(delegations: &mut [&Delegation]) {
    delegations.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.delegation_id.len().cmp(&b.delegation_id.len()))
            .then_with(|| a.delegation_id.cmp(&b.delegation_id))
    });
}

impl Default for SessionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTracker")
            .field("namespace", &self.namespace)
            .field("session_count", &self.sessions.len())
            .field("delegation_count", &self.delegations.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ManualClock;
    use crate::tracking::SessionStatus;
    use chrono::{TimeZone, Utc};
    use std::collections::HashSet;

    fn manual_tracker() -> (SessionTracker, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        ));
        (SessionTracker::with_clock(clock.clone()), clock)
    }

    #[test]
    fn test_root_sessions_have_depth_zero() {
        let mut tracker = SessionTracker::new();

        tracker.register_session("s1", "orchestrator", None);
        tracker.register_session("s2", "worker", Some("never-registered"));

        let root = tracker.get_session("s1").unwrap();
        assert_eq!(root.depth, 0);
        assert!(root.parent_id.is_none());

        let orphan = tracker.get_session("s2").unwrap();
        assert_eq!(orphan.depth, 0);
        assert_eq!(orphan.parent_id.as_deref(), Some("never-registered"));
    }

    #[test]
    fn test_depth_follows_parent_chain() {
        let mut tracker = SessionTracker::new();

        tracker.register_session("root", "orchestrator", None);
        tracker.register_session("child", "planner", Some("root"));
        tracker.register_session("grandchild", "worker", Some("child"));
        tracker.register_session("great-grandchild", "reviewer", Some("grandchild"));

        let depths: Vec<usize> = ["root", "child", "grandchild", "great-grandchild"]
            .iter()
            .map(|id| tracker.get_session(id).unwrap().depth)
            .collect();
        assert_eq!(depths, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_depth_is_fixed_at_registration() {
        let mut tracker = SessionTracker::new();

        tracker.register_session("child", "worker", Some("root"));
        tracker.register_session("root", "orchestrator", None);

        // Parent arriving later does not retroactively deepen the child
        assert_eq!(tracker.get_session("child").unwrap().depth, 0);
    }

    #[test]
    fn test_reregistration_overwrites() {
        let (mut tracker, clock) = manual_tracker();

        tracker.register_session("root", "orchestrator", None);
        tracker.register_session("s1", "worker", None);
        tracker.complete_session("s1");
        clock.advance(Duration::seconds(5));
        tracker.register_session("s1", "reviewer", Some("root"));

        let session = tracker.get_session("s1").unwrap();
        assert_eq!(session.agent, "reviewer");
        assert_eq!(session.depth, 1);
        assert_eq!(session.status(), SessionStatus::Running);
        assert_eq!(session.start_time, clock.now());
        assert_eq!(tracker.session_count(), 2);
    }

    #[test]
    fn test_delegation_ids_never_collide() {
        let mut tracker = SessionTracker::new();
        let mut seen = HashSet::new();

        for i in 0..10_000 {
            let id = tracker.record_delegation("s1", "worker", &format!("task {}", i));
            assert!(seen.insert(id), "duplicate delegation id at call {}", i);
        }
        assert_eq!(tracker.delegation_count(), 10_000);
    }

    #[test]
    fn test_delegation_ids_not_reused_after_clear() {
        let mut tracker = SessionTracker::new();

        let before = tracker.record_delegation("s1", "worker", "a");
        tracker.clear();
        let after = tracker.record_delegation("s1", "worker", "a");

        assert_ne!(before, after);
    }

    #[test]
    fn test_delegation_ids_unique_across_trackers() {
        let mut first = SessionTracker::new();
        let mut second = SessionTracker::new();

        assert_ne!(
            first.record_delegation("s1", "worker", "a"),
            second.record_delegation("s1", "worker", "a")
        );
    }

    #[test]
    fn test_record_delegation_with_unregistered_parent() {
        let mut tracker = SessionTracker::new();

        let id = tracker.record_delegation("ghost", "worker", "do X");
        let delegation = tracker.get_delegation(&id).unwrap();

        assert_eq!(delegation.parent_session_id, "ghost");
        assert!(!delegation.is_linked());
        assert!(tracker.get_session("ghost").is_none());
    }

    #[test]
    fn test_link_unknown_delegation_is_noop() {
        let mut tracker = SessionTracker::new();
        tracker.register_session("s1", "orchestrator", None);
        let id = tracker.record_delegation("s1", "worker", "do X");
        let before = tracker.snapshot();

        tracker.link_child_session("nonexistent-id", "s9");

        assert!(tracker.get_delegation("nonexistent-id").is_none());
        assert!(!tracker.get_delegation(&id).unwrap().is_linked());
        assert_eq!(tracker.snapshot(), before);
    }

    #[test]
    fn test_relink_keeps_last_child() {
        let mut tracker = SessionTracker::new();
        let id = tracker.record_delegation("s1", "worker", "do X");

        tracker.link_child_session(&id, "s2");
        tracker.link_child_session(&id, "s3");

        assert_eq!(tracker.get_delegation(&id).unwrap().child_session_id(), Some("s3"));
    }

    #[test]
    fn test_complete_sets_end_time_and_duration() {
        let (mut tracker, clock) = manual_tracker();
        tracker.register_session("s1", "orchestrator", None);

        clock.advance(Duration::milliseconds(1250));
        tracker.complete_session("s1");
        clock.advance(Duration::seconds(30));

        let session = tracker.get_session("s1").unwrap();
        let end = session.end_time.unwrap();
        assert!(end >= session.start_time);
        assert_eq!(tracker.duration("s1"), Some(end - session.start_time));
        assert_eq!(tracker.duration("s1"), Some(Duration::milliseconds(1250)));
    }

    #[test]
    fn test_complete_on_system_clock() {
        let mut tracker = SessionTracker::new();
        tracker.register_session("s1", "orchestrator", None);
        tracker.complete_session("s1");

        let session = tracker.get_session("s1").unwrap();
        let end = session.end_time.unwrap();
        assert!(end >= session.start_time);
        assert_eq!(tracker.duration("s1"), Some(end - session.start_time));
    }

    #[test]
    fn test_recomplete_moves_end_time() {
        let (mut tracker, clock) = manual_tracker();
        tracker.register_session("s1", "orchestrator", None);

        clock.advance(Duration::seconds(1));
        tracker.complete_session("s1");
        clock.advance(Duration::seconds(1));
        tracker.complete_session("s1");

        assert_eq!(tracker.duration("s1"), Some(Duration::seconds(2)));
    }

    #[test]
    fn test_complete_with_clock_behind_start() {
        let (mut tracker, clock) = manual_tracker();
        tracker.register_session("s1", "orchestrator", None);

        clock.advance(Duration::hours(-2));
        tracker.complete_session("s1");

        let session = tracker.get_session("s1").unwrap();
        assert_eq!(session.end_time, Some(session.start_time));
        assert_eq!(tracker.duration("s1"), Some(Duration::zero()));
    }

    #[test]
    fn test_running_duration_tracks_clock() {
        let (mut tracker, clock) = manual_tracker();
        tracker.register_session("s1", "orchestrator", None);

        clock.advance(Duration::seconds(4));
        assert_eq!(tracker.duration("s1"), Some(Duration::seconds(4)));
        assert_eq!(tracker.duration("unknown"), None);
    }

    #[test]
    fn test_complete_unknown_session_is_noop() {
        let mut tracker = SessionTracker::new();
        tracker.register_session("s1", "orchestrator", None);
        let before = tracker.snapshot();

        tracker.complete_session("s9");

        assert!(tracker.get_session("s9").is_none());
        assert_eq!(tracker.snapshot(), before);
    }

    #[test]
    fn test_clear_forgets_everything() {
        let mut tracker = SessionTracker::new();
        tracker.register_session("s1", "orchestrator", None);
        tracker.register_session("s2", "worker", Some("s1"));
        let id = tracker.record_delegation("s1", "worker", "do X");

        tracker.clear();

        assert!(tracker.is_empty());
        assert!(tracker.get_session("s1").is_none());
        assert!(tracker.get_session("s2").is_none());
        assert!(tracker.get_delegation(&id).is_none());
    }

    #[test]
    fn test_delegation_lifecycle_scenario() {
        let mut tracker = SessionTracker::new();

        tracker.register_session("s1", "orchestrator", None);
        assert_eq!(tracker.get_session("s1").unwrap().depth, 0);

        let d1 = tracker.record_delegation("s1", "worker", "do X");

        tracker.register_session("s2", "worker", Some("s1"));
        assert_eq!(tracker.get_session("s2").unwrap().depth, 1);

        tracker.link_child_session(&d1, "s2");
        assert_eq!(tracker.get_delegation(&d1).unwrap().child_session_id(), Some("s2"));

        tracker.complete_session("s2");
        let s2 = tracker.get_session("s2").unwrap();
        assert!(s2.end_time.is_some());
        assert!(s2.end_time.unwrap() >= s2.start_time);
    }

    #[test]
    fn test_children_and_delegations_are_ordered() {
        let (mut tracker, clock) = manual_tracker();
        tracker.register_session("root", "orchestrator", None);

        let first = tracker.record_delegation("root", "worker", "one");
        clock.advance(Duration::milliseconds(10));
        tracker.register_session("b", "worker", Some("root"));
        let second = tracker.record_delegation("root", "reviewer", "two");
        clock.advance(Duration::milliseconds(10));
        tracker.register_session("a", "reviewer", Some("root"));
        tracker.record_delegation("elsewhere", "worker", "three");

        let children: Vec<&str> = tracker
            .children_of("root")
            .iter()
            .map(|s| s.session_id.as_str())
            .collect();
        assert_eq!(children, vec!["b", "a"]);

        let delegations: Vec<&str> = tracker
            .delegations_from("root")
            .iter()
            .map(|d| d.delegation_id.as_str())
            .collect();
        assert_eq!(delegations, vec![first.as_str(), second.as_str()]);
    }

    #[test]
    fn test_snapshot_order_with_equal_timestamps() {
        let (mut tracker, _clock) = manual_tracker();
        let ids: Vec<String> = (0..12)
            .map(|i| tracker.record_delegation("root", "worker", &i.to_string()))
            .collect();

        let snapshot = tracker.snapshot();
        let ordered: Vec<String> = snapshot
            .delegations
            .iter()
            .map(|d| d.delegation_id.clone())
            .collect();
        assert_eq!(ordered, ids);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut tracker = SessionTracker::new();
        tracker.register_session("s1", "orchestrator", None);
        let id = tracker.record_delegation("s1", "worker", "do X");
        tracker.link_child_session(&id, "s2");

        let json = serde_json::to_value(tracker.snapshot()).unwrap();

        assert_eq!(json["sessions"][0]["session_id"], "s1");
        assert_eq!(json["delegations"][0]["child_session_id"], "s2");
    }
}
