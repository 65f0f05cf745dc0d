//! Resource model: turns manifest entries into fetchable resources.
//!
//! Every active entry is dispatched on its type to one of three strategies:
//!
//! - [`file::FileResource`]: copy a local file or merge a directory
//! - [`git::GitResource`]: clone or update a repository, then copy a sub-path
//! - [`http::HttpResource`]: download a text file
//!
//! Entries are processed one at a time; nothing here is shared between
//! threads.
pub mod file;
pub mod git;
pub mod http;
pub mod helpers {
    //! Shared helpers for resource implementations.
    pub mod fs;
}

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::error::ResourceError;
use crate::exec::Executor;
use crate::http::HttpClient;
use crate::logging::Log;
use crate::manifest::{ResourceEntry, ResourceKind, Settings};

/// Interface for resources that can be described and fetched.
pub trait Resource {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Make the destination match the source.
    ///
    /// # Errors
    ///
    /// Returns an error if a copy, command, or transfer fails.
    fn fetch(&self) -> Result<ResourceChange>;
}

/// Result of fetching a single manifest entry.
///
/// # Examples
///
/// ```
/// use fetcher_cli::resources::ResourceChange;
///
/// assert_ne!(ResourceChange::Cloned, ResourceChange::Updated);
/// assert_eq!(ResourceChange::Inactive.to_string(), "inactive");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceChange {
    /// File copied or downloaded.
    Fetched,
    /// Repository cloned fresh.
    Cloned,
    /// Existing repository reset and pulled.
    Updated,
    /// Entry is inactive; nothing was touched.
    Inactive,
}

impl std::fmt::Display for ResourceChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Fetched => "fetched",
            Self::Cloned => "cloned",
            Self::Updated => "updated",
            Self::Inactive => "inactive",
        })
    }
}

/// Resolved workspace roots.
///
/// Both roots always end with a path separator; destinations are formed by
/// appending the entry path to the root text, so `dst` is always interpreted
/// relative to the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    local: String,
    repositories: String,
}

impl Workspace {
    /// Create a workspace, normalising both roots to end with a separator.
    #[must_use]
    pub fn new(local: &str, repositories: &str) -> Self {
        Self {
            local: with_trailing_separator(local),
            repositories: with_trailing_separator(repositories),
        }
    }

    /// Workspace for the manifest `settings` section.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(&settings.local, &settings.repositories)
    }

    /// Root for fetched output.
    #[must_use]
    pub fn local_root(&self) -> &Path {
        Path::new(&self.local)
    }

    /// Root for cloned repositories.
    #[must_use]
    pub fn repositories_root(&self) -> &Path {
        Path::new(&self.repositories)
    }

    /// Destination path for an entry `dst`.
    #[must_use]
    pub fn local_path(&self, dst: &str) -> PathBuf {
        PathBuf::from(format!("{}{dst}", self.local))
    }

    /// Directory of the repository called `name`.
    #[must_use]
    pub fn repository_path(&self, name: &str) -> PathBuf {
        PathBuf::from(format!("{}{name}", self.repositories))
    }

    /// Create both roots if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if either directory cannot be created.
    pub fn create(&self) -> Result<()> {
        for root in [self.local_root(), self.repositories_root()] {
            std::fs::create_dir_all(root)
                .with_context(|| format!("creating directory {}", root.display()))?;
        }
        Ok(())
    }
}

/// Append `/` unless `path` already ends with a separator.  An empty path
/// means the current directory.
fn with_trailing_separator(path: &str) -> String {
    if path.is_empty() {
        "./".to_string()
    } else if path.ends_with('/') || path.ends_with(std::path::MAIN_SEPARATOR) {
        path.to_string()
    } else {
        format!("{path}/")
    }
}

/// Transport adapters a resource may call out to.
#[derive(Clone, Copy)]
pub struct Backends<'a> {
    /// Runs `git`.
    pub executor: &'a dyn Executor,
    /// Performs downloads.
    pub http: &'a dyn HttpClient,
    /// Receives tool output.
    pub log: &'a dyn Log,
}

impl std::fmt::Debug for Backends<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends")
            .field("executor", &self.executor)
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}

/// An active entry dispatched on its type.
#[derive(Debug)]
pub enum TypedResource<'a> {
    /// `file` entry.
    File(file::FileResource),
    /// `git` entry.
    Git(git::GitResource<'a>),
    /// `http` entry.
    Http(http::HttpResource<'a>),
}

impl<'a> TypedResource<'a> {
    /// Build the resource for `entry`, resolving paths against `workspace`.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnsupportedType`] for an unknown type and
    /// [`ResourceError::MissingField`] when a required field is empty.
    pub fn from_entry(
        entry: &ResourceEntry,
        workspace: &Workspace,
        backends: Backends<'a>,
    ) -> Result<Self, ResourceError> {
        Ok(match entry.resource_kind()? {
            ResourceKind::File => Self::File(file::FileResource::from_entry(entry, workspace)?),
            ResourceKind::Git => Self::Git(git::GitResource::from_entry(
                entry,
                workspace,
                backends.executor,
                backends.log,
            )?),
            ResourceKind::Http => Self::Http(http::HttpResource::from_entry(
                entry,
                workspace,
                backends.http,
            )?),
        })
    }
}

impl Resource for TypedResource<'_> {
    fn description(&self) -> String {
        match self {
            Self::File(r) => r.description(),
            Self::Git(r) => r.description(),
            Self::Http(r) => r.description(),
        }
    }

    fn fetch(&self) -> Result<ResourceChange> {
        match self {
            Self::File(r) => r.fetch(),
            Self::Git(r) => r.fetch(),
            Self::Http(r) => r.fetch(),
        }
    }
}

/// Fetch one manifest entry.  Inactive entries are a no-op.
///
/// # Errors
///
/// Returns an error if the entry is malformed or its fetch fails.
pub fn fetch_entry(
    entry: &ResourceEntry,
    workspace: &Workspace,
    backends: Backends<'_>,
) -> Result<ResourceChange> {
    if !entry.active {
        return Ok(ResourceChange::Inactive);
    }
    TypedResource::from_entry(entry, workspace, backends)?.fetch()
}

/// Shared test helpers for resource unit tests.
#[cfg(test)]
pub mod test_helpers {
    use crate::exec::{ExecResult, Executor};
    use crate::http::{HttpClient, HttpRequest};
    use crate::logging::{FetchStatus, Log};
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// One recorded executor invocation.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedCall {
        pub dir: PathBuf,
        pub command: String,
    }

    /// Mock executor that records every call.
    ///
    /// All calls succeed unless [`failing_at`](Self::failing_at) names the
    /// zero-based index of a call that should fail.
    #[derive(Debug, Default)]
    pub struct MockExecutor {
        fail_at: Option<usize>,
        stdout: String,
        calls: Mutex<Vec<RecordedCall>>,
    }

    impl MockExecutor {
        /// A mock where every call succeeds.
        #[must_use]
        pub fn ok() -> Self {
            Self::default()
        }

        /// A mock whose `index`-th call fails.
        #[must_use]
        pub fn failing_at(index: usize) -> Self {
            Self {
                fail_at: Some(index),
                ..Self::default()
            }
        }

        /// A mock where every call succeeds and prints `stdout`.
        #[must_use]
        pub fn with_stdout(stdout: &str) -> Self {
            Self {
                stdout: stdout.to_string(),
                ..Self::default()
            }
        }

        /// All recorded calls, in order.
        #[must_use]
        pub fn calls(&self) -> Vec<RecordedCall> {
            self.calls.lock().map_or_else(|_| vec![], |g| g.clone())
        }

        /// Recorded command lines only.
        #[must_use]
        pub fn commands(&self) -> Vec<String> {
            self.calls().into_iter().map(|c| c.command).collect()
        }
    }

    impl Executor for MockExecutor {
        fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> anyhow::Result<ExecResult> {
            let index = self.calls.lock().map_or(0, |mut guard| {
                guard.push(RecordedCall {
                    dir: dir.to_path_buf(),
                    command: std::iter::once(program)
                        .chain(args.iter().copied())
                        .collect::<Vec<_>>()
                        .join(" "),
                });
                guard.len() - 1
            });
            if self.fail_at == Some(index) {
                anyhow::bail!("mock command failed");
            }
            Ok(ExecResult {
                stdout: self.stdout.clone(),
                stderr: String::new(),
                success: true,
                code: Some(0),
            })
        }
    }

    /// Logger that drops everything.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct NullLog;

    impl Log for NullLog {
        fn stage(&self, _: &str) {}
        fn info(&self, _: &str) {}
        fn debug(&self, _: &str) {}
        fn warn(&self, _: &str) {}
        fn error(&self, _: &str) {}
        fn record(&self, _: &str, _: FetchStatus, _: Option<&str>) {}
    }

    /// A request as seen by [`MockHttpClient`].
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct RecordedRequest {
        pub url: String,
        pub headers: Vec<(String, String)>,
    }

    /// Mock HTTP client returning a fixed body, or failing when `body` is `None`.
    #[derive(Debug, Default)]
    pub struct MockHttpClient {
        body: Option<String>,
        requests: Mutex<Vec<RecordedRequest>>,
    }

    impl MockHttpClient {
        /// A client answering every request with `body`.
        #[must_use]
        pub fn with_body(body: &str) -> Self {
            Self {
                body: Some(body.to_string()),
                ..Self::default()
            }
        }

        /// A client failing every request.
        #[must_use]
        pub fn failing() -> Self {
            Self::default()
        }

        /// All recorded requests, in order.
        #[must_use]
        pub fn requests(&self) -> Vec<RecordedRequest> {
            self.requests.lock().map_or_else(|_| vec![], |g| g.clone())
        }
    }

    impl HttpClient for MockHttpClient {
        fn get_text(&self, request: &HttpRequest<'_>) -> anyhow::Result<String> {
            if let Ok(mut guard) = self.requests.lock() {
                guard.push(RecordedRequest {
                    url: request.url.to_string(),
                    headers: request
                        .headers()
                        .into_iter()
                        .map(|(k, v)| (k.to_string(), v.to_string()))
                        .collect(),
                });
            }
            self.body
                .clone()
                .ok_or_else(|| anyhow::anyhow!("mock request failed"))
        }
    }
}
