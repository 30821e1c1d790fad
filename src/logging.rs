use chrono::Local;
use tracing::{Event, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

pub const DEFAULT_FILTER: &str = "trx_reporter=warn";
pub const VERBOSE_FILTER: &str = "trx_reporter=debug,warn";

/// `<emoji> LEVEL [HH:MM:SS]: message`
pub struct CustomFormatter;

impl<S, N> FormatEvent<S, N> for CustomFormatter
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
        let timestamp = Local::now().format("%H:%M:%S");

        let (emoji, level_str) = match *event.metadata().level() {
            tracing::Level::TRACE => ("🔬", "TRACE"),
            tracing::Level::DEBUG => ("🐛", "DEBUG"),
            tracing::Level::INFO => ("ℹ️ ", "INFO"),
            tracing::Level::WARN => ("⚠️ ", "WARN"),
            tracing::Level::ERROR => ("❌", "ERROR"),
        };

        write!(writer, "{} {} [{}]: ", emoji, level_str, timestamp)?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Pick the filter directive: RUST_LOG wins, then --verbose, then the config file
pub fn filter_directive(verbose: bool, configured: Option<&str>) -> String {
    if verbose {
        VERBOSE_FILTER.to_string()
    } else {
        configured.unwrap_or(DEFAULT_FILTER).to_string()
    }
}

/// Install the global subscriber. Logs go to stderr; stdout may carry the report.
pub fn init(verbose: bool, configured: Option<&str>) {
    let directive = filter_directive(verbose, configured);
    let _ = tracing_subscriber::fmt()
        .event_format(CustomFormatter)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive)),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive(false, None), DEFAULT_FILTER);
        assert_eq!(filter_directive(true, Some("trx_reporter=error")), VERBOSE_FILTER);
        assert_eq!(
            filter_directive(false, Some("trx_reporter=info")),
            "trx_reporter=info"
        );
    }
}
