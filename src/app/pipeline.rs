//! The query -> fetch -> render workflow.
//!
//! `report_from_response` takes an already-fetched outcome so the whole
//! post-network path can be exercised without a server.

use std::time::Duration;

use crate::data::{DhsClient, FeatureCollection, FetchOutcome, build_query};
use crate::domain::{QueryWindow, RegionSelector};
use crate::error::AppError;
use crate::io::OutputSink;
use crate::report::NO_RESULTS;

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub region: RegionSelector,
    pub window: QueryWindow,
    pub timeout: Duration,
}

/// Execute the full pipeline against the DHS service.
pub fn run_report(config: &ReportConfig, sink: &mut dyn OutputSink) -> Result<(), AppError> {
    let client = DhsClient::from_env(config.timeout)?;
    run_report_with_client(&client, config, sink)
}

pub fn run_report_with_client(
    client: &DhsClient,
    config: &ReportConfig,
    sink: &mut dyn OutputSink,
) -> Result<(), AppError> {
    let query = build_query(client.base_url(), &config.region, config.window.start_date);
    sink.write_line(&query.label)?;

    let outcome = client.fetch(&query)?;
    report_from_response(outcome, sink)
}

/// Turn the fetch outcome into report lines.
///
/// Missing or unusable responses end in a single "no results" line; malformed
/// records are returned as errors.
pub fn report_from_response(outcome: FetchOutcome, sink: &mut dyn OutputSink) -> Result<(), AppError> {
    let body = match outcome {
        FetchOutcome::Body(body) => body,
        FetchOutcome::NoResponse => {
            sink.write_line("Empty response")?;
            return sink.write_line(NO_RESULTS);
        }
        FetchOutcome::BadStatus(code) => {
            sink.write_line(&format!("Bad response code of {code}"))?;
            return sink.write_line(NO_RESULTS);
        }
    };

    let Some(collection) = FeatureCollection::parse(&body) else {
        return sink.write_line(NO_RESULTS);
    };

    let records = collection.into_records()?;
    log::info!("received {} records", records.len());

    crate::report::render(records, sink)
}
