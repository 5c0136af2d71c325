//! Shared domain types.
//!
//! These types are intentionally small and owned by a single run:
//!
//! - `RegionSelector` picks which DHS layer and filter a query targets
//! - `DailyRecord` is one validated row of the API result
//! - `ReportLine` / `RollingWindow` are produced fresh by every render

use chrono::{Days, NaiveDate};

use crate::error::{AppError, ErrorKind};

/// Number of rendered days that make up the rolling positivity window.
pub const ROLLING_WINDOW_DAYS: usize = 14;

/// Scope of a query: entire state, one county, or one municipality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionSelector {
    State,
    County(String),
    Municipality(String),
}

impl RegionSelector {
    /// Resolve the CLI region flags.
    ///
    /// A municipality takes precedence over a county when both are given.
    pub fn from_flags(county: Option<String>, municipality: Option<String>) -> Self {
        match (county, municipality) {
            (_, Some(city)) => RegionSelector::Municipality(city),
            (Some(county), None) => RegionSelector::County(county),
            (None, None) => RegionSelector::State,
        }
    }

    /// Human-readable description of the query scope.
    pub fn label(&self) -> String {
        match self {
            RegionSelector::State => "Query for entire state".to_string(),
            RegionSelector::County(name) => format!("Query for {name} county"),
            RegionSelector::Municipality(name) => format!("Query for municipality \"{name}\""),
        }
    }
}

/// One day of case data for the selected region.
///
/// `cumulative_hospitalized` is a running total; every other count is daily.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRecord {
    pub timestamp_ms: i64,
    pub date: NaiveDate,
    pub new_positive: i64,
    pub new_tests: i64,
    pub new_deaths: i64,
    pub cumulative_hospitalized: i64,
}

/// A single rendered report row.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub date: NaiveDate,
    pub new_positive: i64,
    pub new_tests: i64,
    pub new_deaths: i64,
    pub hospital_delta: i64,
    pub positivity_rate_percent: f64,
}

/// Accumulator over the most recent `ROLLING_WINDOW_DAYS` rendered lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RollingWindow {
    pub positive_sum: i64,
    pub test_sum: i64,
    pub days_accumulated: usize,
}

impl RollingWindow {
    /// Add one day; ignored once the window is full.
    pub fn push(&mut self, new_positive: i64, new_tests: i64) -> Result<(), AppError> {
        if self.days_accumulated >= ROLLING_WINDOW_DAYS {
            return Ok(());
        }
        let (Some(positive_sum), Some(test_sum)) = (
            self.positive_sum.checked_add(new_positive),
            self.test_sum.checked_add(new_tests),
        ) else {
            return Err(AppError::new(
                ErrorKind::MalformedRecord,
                "14-day positive/test totals overflow.",
            ));
        };
        self.positive_sum = positive_sum;
        self.test_sum = test_sum;
        self.days_accumulated += 1;
        Ok(())
    }

    pub fn is_full(&self) -> bool {
        self.days_accumulated == ROLLING_WINDOW_DAYS
    }

    /// Window positivity, or `None` until the window is full.
    pub fn positivity_rate_percent(&self) -> Option<f64> {
        if !self.is_full() {
            return None;
        }
        if self.test_sum == 0 {
            return Some(0.0);
        }
        Some(self.positive_sum as f64 / self.test_sum as f64 * 100.0)
    }
}

/// History window for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    /// Exclusive lower bound sent to the API.
    pub start_date: NaiveDate,
    /// First day the user is told to expect in the report.
    pub display_from: NaiveDate,
}

impl QueryWindow {
    /// Build the window for `days` of history ending at `today`.
    ///
    /// The query reaches two days further back than what is displayed: one day
    /// for the exclusive bound and one for the record consumed by the
    /// hospitalization delta.
    pub fn from_days(today: NaiveDate, days: u32) -> Self {
        let start_date = today
            .checked_sub_days(Days::new(u64::from(days) + 1))
            .unwrap_or(NaiveDate::MIN);
        let display_from = if days == 0 {
            today.checked_add_days(Days::new(1)).unwrap_or(today)
        } else {
            today
                .checked_sub_days(Days::new(u64::from(days) - 1))
                .unwrap_or(NaiveDate::MIN)
        };
        Self {
            start_date,
            display_from,
        }
    }
}

/// Diagnostic verbosity, 0 (silent) through 5 (everything).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Verbosity(u8);

impl Verbosity {
    pub const NONE: Verbosity = Verbosity(0);
    pub const ERRORS: Verbosity = Verbosity(1);
    pub const ALL: Verbosity = Verbosity(5);

    /// Out-of-range levels, negative included, fall back to errors only.
    pub fn from_level(level: i64) -> Self {
        match u8::try_from(level) {
            Ok(level) if level <= Self::ALL.0 => Verbosity(level),
            _ => Self::ERRORS,
        }
    }

    pub fn log_filter(self) -> log::LevelFilter {
        match self.0 {
            0 => log::LevelFilter::Off,
            1 => log::LevelFilter::Error,
            2 => log::LevelFilter::Warn,
            3 => log::LevelFilter::Info,
            4 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        }
    }

    pub fn describe(self) -> &'static str {
        match self.0 {
            5 => "all diagnostic messages",
            4 => "errors, warnings, debug, and informational",
            3 => "errors, warnings, and debug",
            2 => "errors and warnings",
            1 => "errors only",
            _ => "error in output configuration",
        }
    }
}
