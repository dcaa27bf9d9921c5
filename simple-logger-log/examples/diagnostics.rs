use simple_logger_log::formatter::LogFormatter;
use simple_logger_log::*;

fn main() {
    let clock = LocalClock::detect().unwrap_or_default();
    SubscriberBuilder::new()
        .with_event_format(LogFormatter::new(clock.offset()))
        .with_level(Level::DEBUG)
        .try_init()
        .expect("a subscriber is already installed");

    let span = tracing::info_span!("session", identifier = "simple-logger");
    let _guard = span.enter();
    for count in 1..=3 {
        info!(count, "diagnostic event");
        std::thread::sleep(std::time::Duration::from_millis(200));
    }
    warn!("done");
}
