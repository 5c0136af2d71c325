//! Diagnostic logging setup (`log` facade, `env_logger` backend).
//!
//! Records look like `20201003 14:05:09 DBG>dhs_trends::data::dhs - message`
//! and go to stderr, or to the report file when one is in use.

use std::fs::File;
use std::io::Write;

use chrono::Local;
use log::Level;

use crate::domain::Verbosity;

pub fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERR",
        Level::Warn => "WRN",
        Level::Info => "INF",
        Level::Debug => "DBG",
        Level::Trace => "ALL",
    }
}

/// Install the global logger. Later calls are no-ops.
pub fn init(verbosity: Verbosity, file: Option<File>) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(verbosity.log_filter())
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {}>{} - {}",
                Local::now().format("%Y%m%d %X"),
                level_tag(record.level()),
                record.target(),
                record.args()
            )
        });

    if let Some(file) = file {
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    builder.try_init().ok();
}
