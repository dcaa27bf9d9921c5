pub mod appender;
pub mod clock;
pub mod formatter;

use time::UtcOffset;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::format::FormatEvent;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use crate::formatter::LogFormatter;

pub use clock::LocalClock;
pub use tracing::Level;
pub use tracing::{debug, error, info, trace, warn};

/// Installs the process-wide diagnostic subscriber.
///
/// Diagnostics go to stderr so they never interleave with the entries a run
/// prints on stdout. `RUST_LOG` overrides the configured level.
pub struct SubscriberBuilder<E = LogFormatter> {
    event_formatter: E,
    level: Level,
}

impl SubscriberBuilder {
    pub fn new() -> Self {
        SubscriberBuilder {
            event_formatter: LogFormatter::default(),
            level: Level::INFO,
        }
    }

    /// Stamps diagnostics with the given offset instead of UTC.
    pub fn with_offset(self, offset: UtcOffset) -> Self {
        SubscriberBuilder {
            event_formatter: LogFormatter::new(offset),
            ..self
        }
    }
}

impl Default for SubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> SubscriberBuilder<E>
where
    E: FormatEvent<Registry, fmt::format::DefaultFields> + Send + Sync + 'static,
{
    pub fn with_event_format<F>(self, formatter: F) -> SubscriberBuilder<F>
    where
        F: FormatEvent<Registry, fmt::format::DefaultFields> + Send + Sync + 'static,
    {
        SubscriberBuilder {
            event_formatter: formatter,
            level: self.level,
        }
    }

    pub fn with_level(self, level: Level) -> Self {
        SubscriberBuilder { level, ..self }
    }

    pub fn try_init(self) -> Result<(), TryInitError> {
        let filter = EnvFilter::builder()
            .with_default_directive(LevelFilter::from_level(self.level).into())
            .from_env_lossy();
        let layer = fmt::layer()
            .event_format(self.event_formatter)
            .with_writer(std::io::stderr)
            .with_ansi(false);
        tracing_subscriber::registry().with(layer).with(filter).try_init()
    }
}
