//! Optional systemd journal sink.
//!
//! Records go through `libsystemd`, which speaks the journald native protocol
//! and hands oversized records to journald as a sealed memfd.

use std::fs;
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};

use libsystemd::errors::SdError;
use libsystemd::logging::{Priority, journal_send};
use nix::unistd::{AccessFlags, access};
use thiserror::Error;

use crate::record::LogRecord;

pub const JOURNAL_SOCKET: &str = "/run/systemd/journal/socket";

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("failed to send to journald: {0}")]
    Send(#[from] SdError),
}

/// A destination for structured per-tick records.
pub trait JournalSink {
    fn send(&mut self, identifier: &str, record: &LogRecord) -> Result<(), JournalError>;
}

/// Used when the journal is absent or was not requested.
#[derive(Debug, Default)]
pub struct Disabled;

impl JournalSink for Disabled {
    fn send(&mut self, _identifier: &str, _record: &LogRecord) -> Result<(), JournalError> {
        Ok(())
    }
}

/// Writes to the host journal.
#[derive(Debug)]
pub struct NativeJournal {
    socket: PathBuf,
}

impl NativeJournal {
    /// Returns a sink if the host journal socket accepts writes from this process.
    pub fn detect() -> Option<Self> {
        Self::detect_at(JOURNAL_SOCKET)
    }

    /// Like [`NativeJournal::detect`], checking `path` instead of the host socket.
    pub fn detect_at(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();
        is_writable_socket(path).then(|| Self {
            socket: path.to_path_buf(),
        })
    }

    /// The socket that was found writable.
    pub fn path(&self) -> &Path {
        &self.socket
    }
}

impl JournalSink for NativeJournal {
    fn send(&mut self, identifier: &str, record: &LogRecord) -> Result<(), JournalError> {
        journal_send(
            Priority::Info,
            &record.message(),
            fields(identifier, record).into_iter(),
        )?;
        Ok(())
    }
}

/// Picks the sink for a run. The journal is only used when it was both
/// enabled and found on the host.
pub fn select(enabled: bool, available: Option<Box<dyn JournalSink>>) -> Box<dyn JournalSink> {
    match available {
        Some(sink) if enabled => sink,
        _ => Box::new(Disabled),
    }
}

/// Fields attached to one record besides `MESSAGE` and `PRIORITY`, which
/// `journal_send` sets itself.
pub fn fields(identifier: &str, record: &LogRecord) -> Vec<(&'static str, String)> {
    vec![
        ("SYSLOG_IDENTIFIER", identifier.to_string()),
        ("TIMESTAMP", record.timestamp().to_string()),
        ("LOG_COUNT", record.sequence().to_string()),
    ]
}

fn is_writable_socket(path: &Path) -> bool {
    let is_socket = fs::metadata(path)
        .map(|meta| meta.file_type().is_socket())
        .unwrap_or(false);
    is_socket && access(path, AccessFlags::W_OK).is_ok()
}
