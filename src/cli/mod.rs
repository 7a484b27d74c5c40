//! Terminal-facing pieces: trace formatting and command line arguments

pub mod args;
pub mod formatter;

pub use args::Cli;
pub use formatter::{format_duration, FormatOptions, Role, TraceFormatter};
