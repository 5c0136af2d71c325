//! `dhs-trends` library crate.
//!
//! The binary (`dhs`) is a thin wrapper around this library so that:
//!
//! - the query and report logic is testable without spawning processes
//! - output destinations are injected rather than global

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
