use std::fmt;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::{FmtContext, FormattedFields};
use tracing_subscriber::registry::LookupSpan;

const STAMP: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]");

/// Diagnostic event formatter:
/// `[2024-01-02 03:04:05.678] [INFO] [span{field=..} / child] message k=v [file:line]`
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFormatter {
    offset: Option<UtcOffset>,
}

impl LogFormatter {
    pub fn new(offset: UtcOffset) -> Self {
        Self {
            offset: Some(offset),
        }
    }

    fn stamp(&self) -> Result<String, fmt::Error> {
        OffsetDateTime::now_utc()
            .to_offset(self.offset.unwrap_or(UtcOffset::UTC))
            .format(STAMP)
            .map_err(|_| fmt::Error)
    }
}

/// `name{fields}` for each span from the root down, or `None` outside any span.
fn span_path<S, N>(ctx: &FmtContext<'_, S, N>) -> Option<String>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    let labels: Vec<String> = ctx
        .event_scope()?
        .from_root()
        .map(|span| match span.extensions().get::<FormattedFields<N>>() {
            Some(fields) if !fields.is_empty() => format!("{}{{{fields}}}", span.name()),
            _ => span.name().to_string(),
        })
        .collect();
    Some(labels.join(" / "))
}

fn location(metadata: &Metadata<'_>) -> String {
    match (metadata.file(), metadata.line()) {
        (Some(file), Some(line)) => format!("{file}:{line}"),
        (Some(file), None) => file.to_string(),
        (None, _) => metadata.target().to_string(),
    }
}

impl<S, N> FormatEvent<S, N> for LogFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        write!(writer, "[{}] [{}] ", self.stamp()?, metadata.level())?;
        if let Some(spans) = span_path(ctx) {
            write!(writer, "[{spans}] ")?;
        }
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer, " [{}]", location(metadata))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::{info, info_span, warn};
    use tracing_subscriber::fmt::{self, MakeWriter};
    use tracing_subscriber::layer::SubscriberExt;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Capture {
        type Writer = Capture;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture<F: FnOnce()>(f: F) -> String {
        let sink = Capture::default();
        let layer = fmt::layer()
            .event_format(LogFormatter::new(UtcOffset::UTC))
            .with_writer(sink.clone())
            .with_ansi(false);
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, f);
        let bytes = sink.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn formats_level_fields_and_location() {
        let out = capture(|| warn!(count = 2, "journal send failed"));
        assert!(out.starts_with('['));
        assert!(out.contains("] [WARN] journal send failed count=2 ["));
        assert!(out.contains("formatter.rs:"));
        assert!(out.ends_with('\n'));
    }

    #[test]
    fn nests_span_names_with_fields() {
        let out = capture(|| {
            let outer = info_span!("session", entries = 3);
            let _outer = outer.enter();
            let inner = info_span!("tick");
            let _inner = inner.enter();
            info!("sent");
        });
        assert!(out.contains("[INFO] [session{entries=3} / tick] sent"));
    }
}
