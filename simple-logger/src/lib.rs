//! Emits synthetic log entries at a fixed rate for a fixed duration.
//!
//! Each entry goes to the console, to a timestamped file and, when the host
//! has one and it was requested, to the systemd journal.

pub mod config;
pub mod error;
pub mod interrupt;
pub mod journal;
pub mod record;
pub mod runner;
pub mod session;

use std::io::Write;

use simple_logger_log::LocalClock;
use simple_logger_log::appender::Builder;
use tracing::info;

pub use config::{Config, EnvSettings, SettingsSource};
pub use error::Error;
pub use interrupt::{Interrupt, InterruptHandle};
pub use journal::{JournalSink, NativeJournal};
pub use runner::{Outcome, RunPlan, Runner};
pub use session::Session;

pub const FILE_PREFIX: &str = "application_log";

/// Resolves the configuration, provisions the log file and runs to completion
/// or interruption.
///
/// `detected` is the host journal, if there is one; it is only used when the
/// settings also ask for it. Nothing touches the filesystem until the
/// configuration has been validated.
pub fn launch<W: Write>(
    settings: &dyn SettingsSource,
    detected: Option<Box<dyn JournalSink>>,
    clock: LocalClock,
    console: W,
    interrupt: &Interrupt,
) -> Result<Outcome, Error> {
    let config = Config::from_source(settings, detected.is_some())?;

    let file = Builder::new()
        .filename_prefix(FILE_PREFIX)
        .build(&config.log_directory, &clock.now())?;
    info!(path = %file.path().display(), "log file created");

    let journal = journal::select(config.enable_journal, detected);
    let session = Session::new(console, file);
    let outcome = Runner::new(&config, session, journal, clock).run(interrupt)?;
    Ok(outcome)
}
