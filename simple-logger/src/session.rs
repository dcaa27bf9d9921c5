use std::io::{self, Write};
use std::path::Path;

use simple_logger_log::appender::SessionFile;

use crate::config::Config;
use crate::record::LogRecord;
use crate::runner::{Outcome, RunError};

/// The console and the open log file for one run.
///
/// Every line is flushed as soon as it is written. The file handle is closed
/// when the session is dropped, which the runner does on every exit path.
#[derive(Debug)]
pub struct Session<W: Write> {
    console: W,
    file: SessionFile,
}

impl<W: Write> Session<W> {
    pub fn new(console: W, file: SessionFile) -> Self {
        Self { console, file }
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn banner(&mut self, config: &Config) -> Result<(), RunError> {
        let journal = if config.enable_journal { "enabled" } else { "disabled" };
        let lines = [
            format!(
                "Starting logger. Will run for {} minutes, logging {} times per minute.",
                config.duration_minutes, config.logs_per_minute
            ),
            format!("Logs will be written to: {}", self.path().display()),
            format!("Journald logging is {journal}"),
        ];
        for line in &lines {
            self.both(line)?;
        }
        self.console("Press Ctrl+C to stop.")
    }

    pub fn entry(&mut self, record: &LogRecord) -> Result<(), RunError> {
        self.both(&record.to_string())
    }

    pub fn summary(&mut self, config: &Config, outcome: Outcome) -> Result<(), RunError> {
        let line = match outcome {
            Outcome::Completed { entries } => format!(
                "Logger completed after {} minutes with {} log entries.",
                config.duration_minutes, entries
            ),
            Outcome::Interrupted { entries } => {
                format!("Logger stopped manually after {entries} log entries.")
            }
        };
        self.both(&line)
    }

    fn both(&mut self, line: &str) -> Result<(), RunError> {
        self.console(line)?;
        write_line(&mut self.file, line).map_err(|source| RunError::File {
            path: self.file.path().to_path_buf(),
            source,
        })
    }

    fn console(&mut self, line: &str) -> Result<(), RunError> {
        write_line(&mut self.console, line).map_err(RunError::Console)
    }
}

fn write_line(writer: &mut impl Write, line: &str) -> io::Result<()> {
    writeln!(writer, "{line}")?;
    writer.flush()
}
