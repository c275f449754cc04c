//! Tracing subscriber setup: one event classification rendered twice, as a
//! colored console line and as a plain timestamped log-file line.
use std::fmt;
use std::fs;
use std::io::Write as _;
use std::sync::Mutex;

use tracing::{Event, Level};

use super::utils::{format_utc_datetime, format_utc_time, log_file_path, strip_ansi};

/// What a logged line means to the user, derived from level and target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Stage,
    Success,
    DryRun,
    Info,
    Warn,
    Error,
    Verbose,
}

impl LineKind {
    fn of(event: &Event<'_>) -> Self {
        let metadata = event.metadata();
        match (*metadata.level(), metadata.target()) {
            (Level::ERROR, _) => Self::Error,
            (Level::WARN, _) => Self::Warn,
            (Level::INFO, "dotsync::stage") => Self::Stage,
            (Level::INFO, "dotsync::success") => Self::Success,
            (Level::INFO, "dotsync::dry_run") => Self::DryRun,
            (Level::INFO, _) => Self::Info,
            _ => Self::Verbose,
        }
    }

    /// Console rendering, colors included.
    fn console(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("\x1b[1;36m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Self::Success => format!("\x1b[32m✔\x1b[0m {msg}"),
            Self::DryRun => format!("  \x1b[33m[TEST]\x1b[0m {msg}"),
            Self::Info => format!("\x1b[34mi\x1b[0m {msg}"),
            Self::Warn => format!("\x1b[33m!\x1b[0m {msg}"),
            Self::Error => format!("\x1b[31m✗\x1b[0m {msg}"),
            Self::Verbose => format!("  \x1b[2m{msg}\x1b[0m"),
        }
    }

    /// Log-file tag placed after the timestamp.
    const fn file_tag(self) -> &'static str {
        match self {
            Self::Stage => "==> ",
            Self::Success => "    [ok] ",
            Self::DryRun => "    [test] ",
            Self::Info => "    ",
            Self::Warn => "    [warn] ",
            Self::Error => "    [error] ",
            Self::Verbose => "    [debug] ",
        }
    }
}

/// Pull the formatted `message` field out of an event.
fn message_of(event: &Event<'_>) -> String {
    #[derive(Default)]
    struct Message(String);

    impl tracing::field::Visit for Message {
        fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }

        fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
            if field.name() == "message" {
                self.0 = value.to_string();
            }
        }
    }

    let mut message = Message::default();
    event.record(&mut message);
    message.0
}

/// Layer appending every event to `<cache>/dotsync/<command>.log`, ANSI
/// codes stripped.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<fs::File>,
}

impl FileLayer {
    /// Truncate the log file for `command`, write a run header, and open it
    /// for appending.  `None` when the cache directory is unusable.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        let version =
            option_env!("DOTSYNC_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
        let rule = "=".repeat(42);
        let header = format!(
            "{rule}\ndotsync {version} {command} {}\n{rule}\n",
            format_utc_datetime()
        );
        fs::write(&path, header).ok()?;
        let file = fs::OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let line = format!(
            "[{}] {}{}",
            format_utc_time(),
            LineKind::of(event).file_tag(),
            strip_ansi(&message_of(event))
        );
        if let Ok(mut f) = self.file.lock() {
            writeln!(f, "{line}").ok();
        }
    }
}

/// Console event format: one colored status line per event.
struct StatusFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for StatusFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        writeln!(writer, "{}", LineKind::of(event).console(&message_of(event)))
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Warnings and errors go to stderr, everything else to stdout; debug lines
/// reach the console only when `verbose`.  The log file always receives
/// every event, `debug` included.  Call once, before any logging.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = tracing_subscriber::fmt::layer()
        .event_format(StatusFormatter)
        .with_writer(make_writer)
        .with_filter(console_level);

    let file_layer = FileLayer::new(command).map(|l| l.with_filter(LevelFilter::DEBUG));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_tags_match_console_meaning() {
        assert_eq!(LineKind::Stage.file_tag(), "==> ");
        assert_eq!(LineKind::Success.file_tag(), "    [ok] ");
        assert_eq!(LineKind::DryRun.file_tag(), "    [test] ");
        assert_eq!(LineKind::Info.file_tag(), "    ");
    }

    #[test]
    fn console_lines_strip_to_plain_text() {
        assert_eq!(strip_ansi(&LineKind::Error.console("boom")), "✗ boom");
        assert_eq!(strip_ansi(&LineKind::Stage.console("Links")), "==> Links");
        assert_eq!(strip_ansi(&LineKind::DryRun.console("x")), "  [TEST] x");
    }
}
