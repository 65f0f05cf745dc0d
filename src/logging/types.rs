//! Summary entries and the [`Log`] trait.

/// Outcome of one manifest entry, for the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryEntry {
    /// Entry label, e.g. `1/3 file`.
    pub name: String,
    /// What happened to the entry.
    pub status: FetchStatus,
    /// Optional detail (e.g. `cloned` or `updated` for git entries).
    pub message: Option<String>,
}

/// Status of a processed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    /// Destination was written.
    Fetched,
    /// Entry was skipped because it is not active.
    Inactive,
}

/// Abstraction over logging backends.
///
/// Commands log through `&dyn Log` so that tests can capture or silence
/// output without a global subscriber.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Record an entry result for the summary.
    fn record(&self, name: &str, status: FetchStatus, message: Option<&str>);
    /// Print the summary of recorded entries.
    fn summary(&self) {}
}
