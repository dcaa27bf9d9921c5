use time::error::IndeterminateOffset;
use time::{OffsetDateTime, UtcOffset};

/// Wall clock pinned to the local UTC offset observed at startup.
///
/// The offset has to be captured while the process is still single-threaded:
/// `time` refuses to read it once other threads (such as the signal handler)
/// are running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClock {
    offset: UtcOffset,
}

impl LocalClock {
    pub fn detect() -> Result<Self, IndeterminateOffset> {
        UtcOffset::current_local_offset().map(Self::with_offset)
    }

    pub const fn with_offset(offset: UtcOffset) -> Self {
        Self { offset }
    }

    pub const fn utc() -> Self {
        Self::with_offset(UtcOffset::UTC)
    }

    pub fn offset(&self) -> UtcOffset {
        self.offset
    }

    pub fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }
}

impl Default for LocalClock {
    fn default() -> Self {
        Self::utc()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::offset;

    #[test]
    fn now_carries_the_pinned_offset() {
        let clock = LocalClock::with_offset(offset!(+2));
        assert_eq!(clock.now().offset(), offset!(+2));
    }

    #[test]
    fn utc_clock_tracks_system_time() {
        let before = OffsetDateTime::now_utc();
        let now = LocalClock::utc().now();
        let after = OffsetDateTime::now_utc();
        assert!(before <= now && now <= after);
        assert_eq!(now.offset(), UtcOffset::UTC);
    }
}
