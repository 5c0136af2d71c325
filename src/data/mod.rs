//! Remote data access.
//!
//! - `query`: region + start date -> DHS request descriptor
//! - `dhs`: the blocking HTTP client and response ingest

pub mod dhs;
pub mod query;

pub use dhs::{DhsClient, FeatureCollection, FetchOutcome};
pub use query::{DhsQuery, build_query};
