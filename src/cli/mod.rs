//! Command-line parsing for the DHS trend reporter.
//!
//! Parsing is kept separate from the query/report code; `app` turns these
//! arguments into a `ReportConfig`.

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "dhs",
    version,
    about = "Query the Wisconsin DHS COVID-19 database and print daily trends"
)]
pub struct Cli {
    /// Verbosity level (0 to 5); anything else means errors only.
    #[arg(short = 'v', long = "verbose", default_value_t = 1, allow_negative_numbers = true)]
    pub verbosity: i64,

    /// Name of output file (truncated). Defaults to stdout.
    #[arg(long)]
    pub outfile: Option<PathBuf>,

    /// Specific county.
    #[arg(long)]
    pub county: Option<String>,

    /// Specific municipality (takes precedence over --county).
    #[arg(long)]
    pub muni: Option<String>,

    /// How many previous days.
    #[arg(long, default_value_t = 15)]
    pub days: u32,

    /// HTTP timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["dhs"]);
        assert_eq!(cli.verbosity, 1);
        assert_eq!(cli.days, 15);
        assert_eq!(cli.timeout, 30);
        assert!(cli.outfile.is_none());
        assert!(cli.county.is_none());
        assert!(cli.muni.is_none());
    }

    #[test]
    fn out_of_range_verbosity_still_parses() {
        let cli = Cli::try_parse_from(["dhs", "-v", "-1"]).unwrap();
        assert_eq!(cli.verbosity, -1);
        let cli = Cli::try_parse_from(["dhs", "-v", "300"]).unwrap();
        assert_eq!(cli.verbosity, 300);
        let cli = Cli::try_parse_from(["dhs", "--verbose", "-7", "--county", "Dane"]).unwrap();
        assert_eq!(cli.verbosity, -7);
        assert_eq!(cli.county.as_deref(), Some("Dane"));
    }

    #[test]
    fn region_and_output_flags() {
        let cli = Cli::parse_from([
            "dhs", "-v", "4", "--county", "Dane", "--outfile", "out.txt", "--days", "30",
        ]);
        assert_eq!(cli.verbosity, 4);
        assert_eq!(cli.county.as_deref(), Some("Dane"));
        assert_eq!(cli.outfile, Some(PathBuf::from("out.txt")));
        assert_eq!(cli.days, 30);
    }
}
