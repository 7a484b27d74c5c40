//! Core types shared across the crate
//!
//! - `Clock` / `SystemClock` / `ManualClock` - Time sources for the tracker
//! - `TraceError` - Error types for IO, event decoding and configuration

pub mod clock;
pub mod error;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{TraceError, TraceResult};
