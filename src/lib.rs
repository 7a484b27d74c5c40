pub mod core;

// Session hierarchy tracking
pub mod tracking;

// Formatting and command line surface
pub mod cli;
pub mod logging;

// Driving the logger from recorded or live event streams
pub mod replay;
