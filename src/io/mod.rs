//! Input/output helpers.
//!
//! - report output sinks: console, file, memory (`sink`)

pub mod sink;

pub use sink::*;
