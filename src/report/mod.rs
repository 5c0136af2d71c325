//! Trend derivation: sorting, hospitalization deltas, positivity rates and the
//! rolling 14-day window.
//!
//! Formatting lives in `format` so the derivation stays easy to test on plain
//! values.

use crate::domain::{DailyRecord, ReportLine, RollingWindow};
use crate::error::AppError;
use crate::io::OutputSink;

pub mod format;

pub use format::*;

/// Derived report for one render pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Newest first; one per input record except the oldest.
    pub lines: Vec<ReportLine>,
    pub window: RollingWindow,
}

/// Positivity as a percentage; exactly `0.0` when there were no tests or no positives.
pub fn positivity_rate_percent(new_positive: i64, new_tests: i64) -> f64 {
    if new_tests == 0 || new_positive == 0 {
        return 0.0;
    }
    new_positive as f64 / new_tests as f64 * 100.0
}

/// Sort `records` newest first and derive one line per record except the oldest.
///
/// Records sharing a date keep their arrival order. Counts whose difference
/// or running totals overflow `i64` are rejected as malformed.
pub fn build_report(mut records: Vec<DailyRecord>) -> Result<Report, AppError> {
    records.sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));

    let rendered = records.len().saturating_sub(1);
    let mut lines = Vec::with_capacity(rendered);
    let mut window = RollingWindow::default();

    for i in 0..rendered {
        let today = &records[i];
        let yesterday = &records[i + 1];

        window.push(today.new_positive, today.new_tests)?;
        let hospital_delta = yesterday
            .cumulative_hospitalized
            .checked_sub(today.cumulative_hospitalized)
            .ok_or_else(|| AppError::malformed_record(i, "HOSP_YES", "delta overflows"))?;

        lines.push(ReportLine {
            date: today.date,
            new_positive: today.new_positive,
            new_tests: today.new_tests,
            new_deaths: today.new_deaths,
            hospital_delta,
            positivity_rate_percent: positivity_rate_percent(today.new_positive, today.new_tests),
        });
    }

    Ok(Report { lines, window })
}

/// Render `records` into `sink`.
///
/// An empty collection produces a single "no data" line and nothing else.
pub fn render(records: Vec<DailyRecord>, sink: &mut dyn OutputSink) -> Result<(), AppError> {
    if records.is_empty() {
        return sink.write_line(NO_DATA);
    }

    let report = build_report(records)?;
    log::info!("rendering {} report lines", report.lines.len());

    for header in HEADER {
        sink.write_line(header)?;
    }
    for line in &report.lines {
        sink.write_line(&format_line(line))?;
    }
    if let Some(summary) = format_summary(&report.window) {
        sink.write_line(&summary)?;
    }
    Ok(())
}
