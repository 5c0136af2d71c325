//! Output sinks for report text.
//!
//! Everything user-visible goes through an `OutputSink`, so the renderer never
//! touches stdout or a file handle directly.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::AppError;

pub trait OutputSink {
    fn write_line(&mut self, line: &str) -> Result<(), AppError>;
}

/// Lines go to standard output.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn write_line(&mut self, line: &str) -> Result<(), AppError> {
        let mut out = io::stdout().lock();
        writeln!(out, "{line}").map_err(|e| AppError::io(format!("Failed to write to stdout: {e}")))
    }
}

/// Lines go to a file that is truncated when opened.
#[derive(Debug)]
pub struct FileSink {
    file: File,
}

impl FileSink {
    pub fn create(path: &Path) -> Result<Self, AppError> {
        let file = File::create(path).map_err(|e| {
            AppError::io(format!("Failed to create output file '{}': {e}", path.display()))
        })?;
        Ok(Self { file })
    }

    /// A second handle to the same file, for routing diagnostics alongside the report.
    pub fn try_clone_file(&self) -> Result<File, AppError> {
        self.file
            .try_clone()
            .map_err(|e| AppError::io(format!("Failed to share output file handle: {e}")))
    }
}

impl OutputSink for FileSink {
    fn write_line(&mut self, line: &str) -> Result<(), AppError> {
        writeln!(self.file, "{line}")
            .map_err(|e| AppError::io(format!("Failed to write output file: {e}")))
    }
}

/// Collects lines in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub lines: Vec<String>,
}

impl OutputSink for MemorySink {
    fn write_line(&mut self, line: &str) -> Result<(), AppError> {
        self.lines.push(line.to_string());
        Ok(())
    }
}
