use std::fmt;

use time::OffsetDateTime;
use time::macros::format_description;

const BODY: &str = "Application is running";

/// One synthetic entry. Built at a tick, rendered for each sink, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    sequence: u64,
    timestamp: String,
}

impl LogRecord {
    /// Stamps entry `sequence` with `at`, e.g. `2024-01-02T03:04:05.123456`.
    pub fn new(sequence: u64, at: OffsetDateTime) -> Result<Self, time::error::Format> {
        let format =
            format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]");
        Ok(Self {
            sequence,
            timestamp: at.format(&format)?,
        })
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// The entry text without the timestamp prefix.
    pub fn message(&self) -> String {
        format!("Log entry #{}: {}", self.sequence, BODY)
    }
}

/// The console and file line: `[<timestamp>] Log entry #<n>: Application is running`.
impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] Log entry #{}: {}", self.timestamp, self.sequence, BODY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn renders_line_and_bare_message() {
        let record = LogRecord::new(7, datetime!(2024-01-02 03:04:05.123456 +1)).unwrap();
        assert_eq!(record.sequence(), 7);
        assert_eq!(record.timestamp(), "2024-01-02T03:04:05.123456");
        assert_eq!(record.message(), "Log entry #7: Application is running");
        assert_eq!(
            record.to_string(),
            "[2024-01-02T03:04:05.123456] Log entry #7: Application is running"
        );
    }

    #[test]
    fn whole_seconds_keep_six_fraction_digits() {
        let record = LogRecord::new(1, datetime!(2024-06-30 23:59:59 UTC)).unwrap();
        assert_eq!(record.timestamp(), "2024-06-30T23:59:59.000000");
    }
}
