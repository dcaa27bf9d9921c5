//! Startup configuration, resolved once from a [`SettingsSource`].

use std::collections::HashMap;
use std::num::NonZeroU64;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DURATION_MINUTES: &str = "DURATION_MINUTES";
pub const LOGS_PER_MINUTE: &str = "LOGS_PER_MINUTE";
pub const LOG_DIRECTORY: &str = "LOG_DIRECTORY";
pub const ENABLE_JOURNALD: &str = "ENABLE_JOURNALD";
pub const SYSLOG_IDENTIFIER: &str = "SYSLOG_IDENTIFIER";

const DEFAULT_DURATION_MINUTES: NonZeroU64 = NonZeroU64::new(20).unwrap();
const DEFAULT_LOGS_PER_MINUTE: NonZeroU64 = NonZeroU64::new(2).unwrap();
const DEFAULT_LOG_DIRECTORY: &str = "/tmp/logs";
const DEFAULT_SYSLOG_IDENTIFIER: &str = "simple-logger";

/// Where named settings come from.
pub trait SettingsSource {
    fn get(&self, name: &str) -> Option<String>;
}

/// Reads settings from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvSettings;

impl SettingsSource for EnvSettings {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var_os(name).map(|value| value.to_string_lossy().into_owned())
    }
}

impl SettingsSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

impl SettingsSource for HashMap<&str, &str> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).map(|value| value.to_string())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a valid integer (got '{value}')")]
    NotAnInteger { name: &'static str, value: String },
    #[error("{name} must be a positive integer (got {value})")]
    NotPositive { name: &'static str, value: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub duration_minutes: NonZeroU64,
    pub logs_per_minute: NonZeroU64,
    pub log_directory: PathBuf,
    /// Requested by the user and backed by a reachable journal.
    pub enable_journal: bool,
    pub syslog_identifier: String,
}

impl Config {
    /// Resolves every setting, failing on the first invalid numeric value.
    ///
    /// `journal_available` says whether the host has a journal; the journal is
    /// only enabled when it is both requested and available.
    pub fn from_source(
        source: &dyn SettingsSource,
        journal_available: bool,
    ) -> Result<Self, ConfigError> {
        let duration_minutes = positive(source, DURATION_MINUTES, DEFAULT_DURATION_MINUTES)?;
        let logs_per_minute = positive(source, LOGS_PER_MINUTE, DEFAULT_LOGS_PER_MINUTE)?;
        let log_directory = source
            .get(LOG_DIRECTORY)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIRECTORY));
        let requested = source.get(ENABLE_JOURNALD).is_some_and(|v| truthy(&v));
        let syslog_identifier = source
            .get(SYSLOG_IDENTIFIER)
            .unwrap_or_else(|| DEFAULT_SYSLOG_IDENTIFIER.to_string());

        Ok(Self {
            duration_minutes,
            logs_per_minute,
            log_directory,
            enable_journal: requested && journal_available,
            syslog_identifier,
        })
    }

    pub fn run_length(&self) -> Duration {
        Duration::from_secs(self.duration_minutes.get().saturating_mul(60))
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(60.0 / self.logs_per_minute.get() as f64)
    }
}

fn positive(
    source: &dyn SettingsSource,
    name: &'static str,
    default: NonZeroU64,
) -> Result<NonZeroU64, ConfigError> {
    let Some(raw) = source.get(name) else {
        return Ok(default);
    };
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::NotAnInteger {
            name,
            value: raw.clone(),
        })?;
    u64::try_from(value)
        .ok()
        .and_then(NonZeroU64::new)
        .ok_or(ConfigError::NotPositive { name, value })
}

fn truthy(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "1" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&'static str, &'static str)]) -> HashMap<&'static str, &'static str> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = Config::from_source(&settings(&[]), true).unwrap();
        assert_eq!(config.duration_minutes.get(), 20);
        assert_eq!(config.logs_per_minute.get(), 2);
        assert_eq!(config.log_directory, PathBuf::from("/tmp/logs"));
        assert!(!config.enable_journal);
        assert_eq!(config.syslog_identifier, "simple-logger");
        assert_eq!(config.interval(), Duration::from_secs(30));
        assert_eq!(config.run_length(), Duration::from_secs(20 * 60));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let source = settings(&[
            (DURATION_MINUTES, "3"),
            (LOGS_PER_MINUTE, " +7 "),
            (LOG_DIRECTORY, "/var/tmp/demo"),
            (SYSLOG_IDENTIFIER, "pipeline-test"),
        ]);
        let config = Config::from_source(&source, false).unwrap();
        assert_eq!(config.duration_minutes.get(), 3);
        assert_eq!(config.logs_per_minute.get(), 7);
        assert_eq!(config.log_directory, PathBuf::from("/var/tmp/demo"));
        assert_eq!(config.syslog_identifier, "pipeline-test");
    }

    #[test]
    fn interval_may_be_fractional() {
        let config = Config::from_source(&settings(&[(LOGS_PER_MINUTE, "7")]), false).unwrap();
        let expected = 60.0 / 7.0;
        assert!((config.interval().as_secs_f64() - expected).abs() < 1e-6);
    }

    #[test]
    fn zero_and_negative_rates_are_rejected() {
        for raw in ["0", "-4"] {
            let err = Config::from_source(&settings(&[(LOGS_PER_MINUTE, raw)]), false).unwrap_err();
            assert!(matches!(err, ConfigError::NotPositive { name: LOGS_PER_MINUTE, .. }));
        }
        let err = Config::from_source(&settings(&[(DURATION_MINUTES, "0")]), false).unwrap_err();
        assert_eq!(err.to_string(), "DURATION_MINUTES must be a positive integer (got 0)");
    }

    #[test]
    fn non_integers_are_rejected() {
        for raw in ["", "2.5", "ten", "0x10"] {
            let err = Config::from_source(&settings(&[(DURATION_MINUTES, raw)]), false).unwrap_err();
            assert!(
                matches!(err, ConfigError::NotAnInteger { name: DURATION_MINUTES, .. }),
                "{raw:?} should not parse"
            );
        }
    }

    #[test]
    fn journal_requires_request_and_availability() {
        for (raw, available, expected) in [
            ("true", true, true),
            ("YES", true, true),
            ("1", true, true),
            ("true", false, false),
            ("on", true, false),
            ("0", true, false),
        ] {
            let source = settings(&[(ENABLE_JOURNALD, raw)]);
            let config = Config::from_source(&source, available).unwrap();
            assert_eq!(config.enable_journal, expected, "{raw} / available={available}");
        }
    }
}
