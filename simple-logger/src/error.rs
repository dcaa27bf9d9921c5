use simple_logger_log::appender::InitError;
use thiserror::Error;

use crate::config::{ConfigError, LOG_DIRECTORY};
use crate::runner::RunError;

/// Every way a run can fail. All of them end the process with a non-zero status.
#[derive(Error, Debug)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Provision(#[from] InitError),
    #[error("failed to install the Ctrl+C handler: {0}")]
    Signal(#[from] ctrlc::Error),
    #[error(transparent)]
    Run(#[from] RunError),
}

impl Error {
    /// What the user can do about it, when there is something to do.
    pub fn remediation(&self) -> Option<String> {
        match self {
            Error::Provision(err) if err.is_permission_denied() => Some(format!(
                "Please ensure you have write permissions to this location or specify a different directory using the {LOG_DIRECTORY} environment variable"
            )),
            Error::Provision(err) if err.stage().is_some() => Some(format!(
                "Please specify a valid directory using the {LOG_DIRECTORY} environment variable"
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::path::PathBuf;

    use simple_logger_log::appender::Builder;
    use time::macros::datetime;

    #[test]
    fn provisioning_errors_name_the_directory_setting() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let at = datetime!(2024-01-02 03:04:05 UTC);

        let err = Error::from(Builder::new().build(&blocker, &at).unwrap_err());
        let hint = err.remediation().unwrap();
        assert!(hint.starts_with("Please specify a valid directory"));
        assert!(hint.contains("LOG_DIRECTORY"));
    }

    #[test]
    fn config_and_write_errors_carry_no_remediation() {
        let err = Error::from(ConfigError::NotPositive {
            name: "LOGS_PER_MINUTE",
            value: 0,
        });
        assert_eq!(
            err.to_string(),
            "configuration error: LOGS_PER_MINUTE must be a positive integer (got 0)"
        );
        assert!(err.remediation().is_none());

        let err = Error::from(RunError::File {
            path: PathBuf::from("/tmp/logs/a.log"),
            source: io::Error::from(io::ErrorKind::StorageFull),
        });
        assert!(err.to_string().starts_with("failed to write to log file '/tmp/logs/a.log'"));
        assert!(err.remediation().is_none());
    }
}
