use std::io;
use std::process::ExitCode;

use simple_logger::{EnvSettings, Interrupt, JournalSink, NativeJournal};
use simple_logger_log::{LocalClock, SubscriberBuilder, info, warn};

fn main() -> ExitCode {
    // Must run before any other thread exists.
    let (clock, offset_error) = match LocalClock::detect() {
        Ok(clock) => (clock, None),
        Err(err) => (LocalClock::utc(), Some(err)),
    };

    if let Err(err) = SubscriberBuilder::new().with_offset(clock.offset()).try_init() {
        eprintln!("failed to install the diagnostics subscriber: {err}");
    }
    if let Some(err) = offset_error {
        warn!("{err}; timestamps will be in UTC");
    }

    let journal = match NativeJournal::detect() {
        Some(journal) => {
            info!(socket = %journal.path().display(), "systemd journal is available");
            Some(Box::new(journal) as Box<dyn JournalSink>)
        }
        None => {
            info!("systemd journal is not available; journald logging will be disabled");
            None
        }
    };

    let interrupt = Interrupt::new();
    let result = interrupt
        .install_ctrlc()
        .map_err(simple_logger::Error::from)
        .and_then(|()| simple_logger::launch(&EnvSettings, journal, clock, io::stdout(), &interrupt));

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            // Printed directly so that no `RUST_LOG` filter can hide it.
            eprintln!("Error: {err}");
            if let Some(hint) = err.remediation() {
                eprintln!("{hint}");
            }
            ExitCode::FAILURE
        }
    }
}
