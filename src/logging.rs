use colored::*;
use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::registry::LookupSpan;

/// Tracing event formatter for the demo binary's user-facing output.
///
/// Info lines print bare, everything else gets a lowercase level prefix, and
/// the whole line is tinted by severity. No timestamps or span metadata.
pub struct ColorizedFormatter;

impl<S, N> FormatEvent<S, N> for ColorizedFormatter
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
        // Buffer the fields first so the color applies to the full line.
        let mut line = String::new();
        let mut buf_writer = Writer::new(&mut line);
        ctx.format_fields(buf_writer.by_ref(), event)?;

        let colored_line = match *event.metadata().level() {
            Level::INFO => line.normal(),
            Level::WARN => format!("warn: {line}").yellow(),
            Level::ERROR => format!("error: {line}").red().bold(),
            Level::DEBUG => format!("debug: {line}").dimmed(),
            Level::TRACE => format!("trace: {line}").purple().dimmed(),
        };

        writeln!(writer, "{}", colored_line)
    }
}
