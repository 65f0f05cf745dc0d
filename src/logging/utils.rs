//! Log file location, ANSI stripping and UTC clock helpers.
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// `chrono` format for the run header.
pub(super) const TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S";
/// `chrono` format prefixed to each log line.
pub(super) const CLOCK: &str = "%H:%M:%S";

/// Bytes that end a CSI sequence.
const CSI_FINAL: RangeInclusive<char> = '@'..='~';

/// Remove terminal escape sequences.
///
/// `ESC [ ... <final>` is dropped as a whole; any other escape drops itself
/// and the following character.
pub(super) fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
        } else if chars.next_if_eq(&'[').is_some() {
            chars
                .by_ref()
                .take_while(|c| !CSI_FINAL.contains(c))
                .for_each(drop);
        } else {
            chars.next();
        }
    }
    out
}

/// Directory holding run logs, created on demand.
///
/// `$XDG_CACHE_HOME/fetcher`, else `$HOME/.cache/fetcher`.
pub(super) fn cache_dir() -> Option<PathBuf> {
    let non_empty = |name: &str| std::env::var_os(name).filter(|v| !v.is_empty());
    let base = non_empty("XDG_CACHE_HOME").map_or_else(
        || {
            non_empty("HOME")
                .or_else(|| non_empty("USERPROFILE"))
                .map_or_else(|| PathBuf::from("."), PathBuf::from)
                .join(".cache")
        },
        PathBuf::from,
    );
    let dir = base.join("fetcher");
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// Log file of `command`.
pub(super) fn log_file_path(command: &str) -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(format!("{command}.log")))
}

/// Current UTC time in a `chrono` format.
pub(super) fn utc_now(format: &str) -> String {
    chrono::Utc::now().format(format).to_string()
}
