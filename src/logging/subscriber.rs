//! Rendering of tracing events to the terminal and to the run log.
use std::fs::{self, File, OpenOptions};
use std::io::Write as _;
use std::sync::Mutex;

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;

use super::utils::{CLOCK, TIMESTAMP, log_file_path, strip_ansi, utc_now};

/// Target used for stage headers.
pub(super) const STAGE_TARGET: &str = "fetcher::stage";

/// Presentation class of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Stage,
    Info,
    Warn,
    Error,
    Verbose,
}

impl Kind {
    fn of(event: &Event<'_>) -> Self {
        let metadata = event.metadata();
        match *metadata.level() {
            Level::ERROR => Self::Error,
            Level::WARN => Self::Warn,
            Level::INFO if metadata.target() == STAGE_TARGET => Self::Stage,
            Level::INFO => Self::Info,
            _ => Self::Verbose,
        }
    }

    fn file_line(self, time: &str, msg: &str) -> String {
        match self {
            Self::Stage => format!("[{time}] ==> {msg}"),
            Self::Info => format!("[{time}]     {msg}"),
            Self::Warn => format!("[{time}]     [warn] {msg}"),
            Self::Error => format!("[{time}]     [error] {msg}"),
            Self::Verbose => format!("[{time}]     [debug] {msg}"),
        }
    }

    fn console_line(self, msg: &str) -> String {
        match self {
            Self::Stage => format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m"),
            Self::Info => format!("  {msg}"),
            Self::Warn => format!("\x1b[33mWARN\x1b[0m  {msg}"),
            Self::Error => format!("\x1b[31mERROR\x1b[0m {msg}"),
            Self::Verbose => format!("  \x1b[2m{msg}\x1b[0m"),
        }
    }
}

/// The `message` field of `event`, or an empty string.
fn message(event: &Event<'_>) -> String {
    struct Message(String);

    impl Visit for Message {
        fn record_str(&mut self, field: &Field, value: &str) {
            if field.name() == "message" {
                value.clone_into(&mut self.0);
            }
        }

        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{value:?}");
            }
        }
    }

    let mut visitor = Message(String::new());
    event.record(&mut visitor);
    visitor.0
}

/// First lines of every run log.
fn run_header(command: &str) -> String {
    let version =
        option_env!("FETCHER_VERSION").unwrap_or(concat!("dev-", env!("CARGO_PKG_VERSION")));
    let rule = "=".repeat(42);
    format!(
        "{rule}\nFetcher {version} {command} {}\n{rule}\n",
        utc_now(TIMESTAMP)
    )
}

/// Layer writing every event, colour-free, to the log of one command.
#[derive(Debug)]
pub(super) struct FileLayer {
    file: Mutex<File>,
}

impl FileLayer {
    /// Start a fresh log for `command`.  `None` when the cache is not writable.
    pub(super) fn new(command: &str) -> Option<Self> {
        let path = log_file_path(command)?;
        fs::write(&path, run_header(command)).ok()?;
        let file = OpenOptions::new().append(true).open(&path).ok()?;
        Some(Self {
            file: Mutex::new(file),
        })
    }
}

impl<S: Subscriber> tracing_subscriber::Layer<S> for FileLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let line = Kind::of(event).file_line(&utc_now(CLOCK), &strip_ansi(&message(event)));
        if let Ok(mut file) = self.file.lock() {
            writeln!(file, "{line}").ok();
        }
    }
}

#[derive(Debug)]
struct ConsoleFormat;

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        writeln!(writer, "{}", Kind::of(event).console_line(&message(event)))
    }
}

/// Install the global subscriber.  Call once, before anything logs.
///
/// The terminal gets `info` and above (`debug` too when `verbose`), with
/// warnings and errors on stderr.  The run log at
/// `$XDG_CACHE_HOME/fetcher/<command>.log` always gets `debug` and above.
pub fn init_subscriber(verbose: bool, command: &str) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));
    let console = fmt::layer()
        .event_format(ConsoleFormat)
        .with_writer(writer)
        .with_filter(if verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        });

    tracing_subscriber::registry()
        .with(console)
        .with(FileLayer::new(command).map(|layer| layer.with_filter(LevelFilter::DEBUG)))
        .init();
}
