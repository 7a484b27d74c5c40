//! Replaying trace events
//!
//! A multi-agent run can be traced live (events piped in as they happen) or
//! after the fact from a recorded JSON Lines file. Both go through the
//! `Replayer`, which turns each `TraceEvent` into the matching
//! `MultiAgentLogger` call.

pub mod event;
pub mod replayer;

pub use event::{TimedEvent, TraceEvent};
pub use replayer::Replayer;
