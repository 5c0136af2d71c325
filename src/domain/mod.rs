//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the query scope (`RegionSelector`) and history window (`QueryWindow`)
//! - validated daily case rows (`DailyRecord`)
//! - render outputs (`ReportLine`, `RollingWindow`)

pub mod types;

pub use types::*;
