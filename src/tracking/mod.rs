//! Session hierarchy tracking
//!
//! This module provides `SessionTracker`, the in-memory structure that
//! assigns each session a depth and parent, correlates delegations with the
//! child sessions they spawn, and records completion times.
//!
//! The tracker performs no I/O. Formatters read its records to decide
//! indentation (`depth`), labels (`session_type`) and elapsed time.

pub mod delegation;
pub mod session;
pub mod tracker;

pub use delegation::Delegation;
pub use session::{Session, SessionStatus, SessionType};
pub use tracker::{SessionTracker, TrackerSnapshot};
