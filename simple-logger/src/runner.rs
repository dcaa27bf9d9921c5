use std::io::{self, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use simple_logger_log::LocalClock;
use thiserror::Error;
use tracing::{info, info_span, warn};

use crate::config::Config;
use crate::interrupt::Interrupt;
use crate::journal::JournalSink;
use crate::record::LogRecord;
use crate::session::Session;

/// Failures while the loop is running. Journal send failures are not among
/// them: those are reported and the loop carries on.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("failed to write to the console: {0}")]
    Console(#[source] io::Error),
    #[error("failed to write to log file '{}': {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to render entry timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// Pacing for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPlan {
    pub run_length: Duration,
    pub interval: Duration,
}

impl From<&Config> for RunPlan {
    fn from(config: &Config) -> Self {
        Self {
            run_length: config.run_length(),
            interval: config.interval(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed { entries: u64 },
    Interrupted { entries: u64 },
}

impl Outcome {
    pub fn entries(&self) -> u64 {
        match *self {
            Outcome::Completed { entries } | Outcome::Interrupted { entries } => entries,
        }
    }
}

/// The emission loop.
pub struct Runner<'a, W: Write> {
    config: &'a Config,
    plan: RunPlan,
    session: Session<W>,
    journal: Box<dyn JournalSink>,
    clock: LocalClock,
}

impl<'a, W: Write> Runner<'a, W> {
    pub fn new(
        config: &'a Config,
        session: Session<W>,
        journal: Box<dyn JournalSink>,
        clock: LocalClock,
    ) -> Self {
        Self {
            config,
            plan: RunPlan::from(config),
            session,
            journal,
            clock,
        }
    }

    #[must_use]
    pub fn with_plan(self, plan: RunPlan) -> Self {
        Self { plan, ..self }
    }

    /// Ticks until the run length elapses or `interrupt` fires.
    ///
    /// Consumes the session: the log file is closed when this returns,
    /// whichever way it returns.
    pub fn run(self, interrupt: &Interrupt) -> Result<Outcome, RunError> {
        let Runner {
            config,
            plan,
            mut session,
            mut journal,
            clock,
        } = self;

        let span = info_span!("run", identifier = %config.syslog_identifier);
        let _guard = span.enter();

        // No deadline if the run length does not fit in an `Instant`.
        let end = Instant::now().checked_add(plan.run_length);
        session.banner(config)?;

        let mut count: u64 = 0;
        let outcome = loop {
            if interrupt.is_triggered() {
                break Outcome::Interrupted { entries: count };
            }
            if end.is_some_and(|end| Instant::now() >= end) {
                break Outcome::Completed { entries: count };
            }

            count += 1;
            let record = LogRecord::new(count, clock.now())?;
            session.entry(&record)?;

            match journal.send(&config.syslog_identifier, &record) {
                Ok(()) if config.enable_journal => info!(
                    "sent log #{count} to journald with identifier '{}'",
                    config.syslog_identifier
                ),
                Ok(()) => {}
                Err(err) => warn!(count, "error sending to journald: {err}"),
            }

            if interrupt.wait(plan.interval) {
                break Outcome::Interrupted { entries: count };
            }
        };

        session.summary(config, outcome)?;
        match outcome {
            Outcome::Completed { entries } => info!(entries, "run completed"),
            Outcome::Interrupted { entries } => info!(entries, "run interrupted"),
        }
        Ok(outcome)
    }
}
