//! Fixed-width text formatting for the trend report.

use crate::domain::{ReportLine, RollingWindow};

pub const HEADER: [&str; 2] = [
    "    DATE       NEW      TESTS   POS RATE   DEATHS  HOSPITAL",
    " ----------  -------   ------   --------   ------  --------",
];

pub const NO_DATA: &str = "No data to display";
pub const NO_RESULTS: &str = "No results returned!";

/// Leading space where a minus sign would go, like a `' '` sign flag.
fn space_signed(digits: String, negative: bool) -> String {
    if negative { digits } else { format!(" {digits}") }
}

fn count_column(value: i64, width: usize) -> String {
    let text = space_signed(value.to_string(), value < 0);
    format!("{text:>width$}")
}

/// Six-wide, one decimal, sign-padded.
pub fn format_rate(rate_percent: f64) -> String {
    let text = space_signed(format!("{rate_percent:.1}"), rate_percent.is_sign_negative());
    format!("{text:>6}")
}

pub fn format_line(line: &ReportLine) -> String {
    format!(
        " {}   {}   {}    {}%    {}    {}",
        line.date.format("%m/%d/%Y"),
        count_column(line.new_positive, 6),
        count_column(line.new_tests, 6),
        format_rate(line.positivity_rate_percent),
        count_column(line.new_deaths, 5),
        count_column(line.hospital_delta, 6),
    )
}

/// The 14-day summary, or `None` if fewer than 14 days were accumulated.
pub fn format_summary(window: &RollingWindow) -> Option<String> {
    let pct = window.positivity_rate_percent()?;
    Some(format!(
        "14-day positivity rate: {}% ({} positive of {} tests)",
        space_signed(format!("{pct:.1}"), pct.is_sign_negative()),
        window.positive_sum,
        window.test_sum
    ))
}
