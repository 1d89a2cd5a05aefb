//! Log line formatting.
//!
//! Lines are written as `level=INFO msg="..."`, the key=value layout log
//! shippers already parse for this exporter.

use std::fmt::Write as _;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::{format::Writer, FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

/// Event formatter producing one logfmt line per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logfmt;

impl<S, N> FormatEvent<S, N> for Logfmt
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let mut message = String::new();
        ctx.field_format()
            .format_fields(Writer::new(&mut message), event)?;

        writeln!(
            writer,
            "level={} msg=\"{}\"",
            level_name(event.metadata().level()),
            escape(&message)
        )
    }
}

/// Severity names as operators configure them via `--loglevel`.
fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "TRACE",
        Level::DEBUG => "DEBUG",
        Level::INFO => "INFO",
        Level::WARN => "WARNING",
        Level::ERROR => "ERROR",
    }
}

fn escape(message: &str) -> String {
    message.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::io;
    use std::sync::Arc;
    use tracing_subscriber::FmtSubscriber;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(emit: impl FnOnce()) -> String {
        let buffer = Captured::default();
        let writer = buffer.clone();
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::TRACE)
            .with_ansi(false)
            .event_format(Logfmt)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, emit);
        let bytes = buffer.0.lock().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_logfmt_line() {
        let output = capture(|| tracing::info!("Started Prometheus exporter on port {}", 9100));
        assert_eq!(output, "level=INFO msg=\"Started Prometheus exporter on port 9100\"\n");
    }

    #[test]
    fn test_logfmt_level_names() {
        let output = capture(|| {
            tracing::warn!("slow");
            tracing::error!("Error fetching data: timed out");
        });
        assert_eq!(
            output,
            "level=WARNING msg=\"slow\"\nlevel=ERROR msg=\"Error fetching data: timed out\"\n"
        );
    }

    #[test]
    fn test_logfmt_escapes_quotes() {
        let output = capture(|| tracing::debug!("endpoint \"{}\"", r"a\b"));
        assert_eq!(output, "level=DEBUG msg=\"endpoint \\\"a\\\\b\\\"\"\n");
    }
}
