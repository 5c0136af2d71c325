//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - opens the output sink and installs logging
//! - works out the history window
//! - runs the query/report pipeline

use std::fs::File;
use std::path::Path;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::Parser;

use crate::cli::Cli;
use crate::domain::{QueryWindow, RegionSelector, Verbosity};
use crate::error::AppError;
use crate::io::{ConsoleSink, FileSink, OutputSink};

pub mod pipeline;

use pipeline::ReportConfig;

/// Entry point for the `dhs` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let verbosity = Verbosity::from_level(cli.verbosity);

    let output = open_output(cli.outfile.as_deref());
    crate::logging::init(verbosity, output.log_file);
    if let Some(err) = output.open_error {
        log::error!("{err}; writing to stdout instead");
    }
    let mut sink = output.sink;

    if verbosity > Verbosity::ERRORS {
        sink.write_line(&format!("Output level: {}", verbosity.describe()))?;
    }

    let config = config_from_args(&cli, Local::now().date_naive());
    sink.write_line(&format!(
        "Getting data from {} to now",
        config.window.display_from.format("%m/%d/%Y")
    ))?;

    pipeline::run_report(&config, sink.as_mut())
}

pub fn config_from_args(cli: &Cli, today: NaiveDate) -> ReportConfig {
    ReportConfig {
        region: RegionSelector::from_flags(cli.county.clone(), cli.muni.clone()),
        window: QueryWindow::from_days(today, cli.days),
        timeout: Duration::from_secs(cli.timeout),
    }
}

struct Output {
    sink: Box<dyn OutputSink>,
    log_file: Option<File>,
    open_error: Option<AppError>,
}

/// Pick the report destination; an unopenable file falls back to stdout.
fn open_output(path: Option<&Path>) -> Output {
    let Some(path) = path else {
        return Output {
            sink: Box::new(ConsoleSink),
            log_file: None,
            open_error: None,
        };
    };

    match FileSink::create(path) {
        Ok(sink) => Output {
            log_file: sink.try_clone_file().ok(),
            sink: Box::new(sink),
            open_error: None,
        },
        Err(err) => Output {
            sink: Box::new(ConsoleSink),
            log_file: None,
            open_error: Some(err),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_resolves_region_and_window() {
        let cli = Cli::parse_from(["dhs", "--muni", "Madison", "--days", "20", "--timeout", "5"]);
        let today = NaiveDate::from_ymd_opt(2020, 11, 30).unwrap();
        let config = config_from_args(&cli, today);

        assert_eq!(config.region, RegionSelector::Municipality("Madison".into()));
        assert_eq!(config.window.start_date, NaiveDate::from_ymd_opt(2020, 11, 9).unwrap());
        assert_eq!(config.window.display_from, NaiveDate::from_ymd_opt(2020, 11, 11).unwrap());
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn out_of_range_verbosity_falls_back_to_errors_only() {
        for raw in ["-1", "300", "6"] {
            let cli = Cli::try_parse_from(["dhs", "-v", raw]).unwrap();
            let verbosity = Verbosity::from_level(cli.verbosity);
            assert_eq!(verbosity, Verbosity::ERRORS);
            assert_eq!(verbosity.describe(), "errors only");
        }
    }

    #[test]
    fn unopenable_outfile_falls_back_to_console() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.txt");
        let output = open_output(Some(path.as_path()));
        assert!(output.open_error.is_some());
        assert!(output.log_file.is_none());
    }

    #[test]
    fn outfile_shares_handle_with_logger() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let mut output = open_output(Some(path.as_path()));
        assert!(output.open_error.is_none());
        assert!(output.log_file.is_some());

        output.sink.write_line("Query for entire state").unwrap();
        drop(output);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "Query for entire state\n");
    }
}
