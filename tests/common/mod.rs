// Shared helpers for integration tests.
//
// Provides a temporary workspace with a manifest builder and in-memory
// doubles for logging and HTTP, so each test runs the real commands without
// touching the network or the user's cache directory.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use fetcher_cli::commands::Context;
use fetcher_cli::exec::SystemExecutor;
use fetcher_cli::http::{HttpClient, HttpRequest};
use fetcher_cli::logging::{FetchStatus, Log};
use fetcher_cli::manifest::{Manifest, ResourceEntry, Settings};
use fetcher_cli::prompt::FixedAnswer;

/// Logger that keeps messages in memory.
#[derive(Debug, Default)]
pub struct MemoryLog {
    lines: Mutex<Vec<String>>,
    records: Mutex<Vec<(String, FetchStatus)>>,
}

impl MemoryLog {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lines().iter().any(|l| l.contains(needle))
    }

    pub fn records(&self) -> Vec<(String, FetchStatus)> {
        self.records.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    fn push(&self, msg: &str) {
        if let Ok(mut guard) = self.lines.lock() {
            guard.push(msg.to_string());
        }
    }
}

impl Log for MemoryLog {
    fn stage(&self, msg: &str) {
        self.push(msg);
    }
    fn info(&self, msg: &str) {
        self.push(msg);
    }
    fn debug(&self, msg: &str) {
        self.push(msg);
    }
    fn warn(&self, msg: &str) {
        self.push(msg);
    }
    fn error(&self, msg: &str) {
        self.push(msg);
    }
    fn record(&self, name: &str, status: FetchStatus, _message: Option<&str>) {
        if let Ok(mut guard) = self.records.lock() {
            guard.push((name.to_string(), status));
        }
    }
}

/// HTTP client serving fixed bodies by URL and recording request headers.
#[derive(Debug, Default)]
pub struct StaticHttp {
    bodies: Vec<(String, String)>,
    seen: Mutex<Vec<(String, Vec<(String, String)>)>>,
}

impl StaticHttp {
    pub fn serving(url: &str, body: &str) -> Self {
        Self {
            bodies: vec![(url.to_string(), body.to_string())],
            ..Self::default()
        }
    }

    pub fn seen(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.seen.lock().map_or_else(|_| vec![], |g| g.clone())
    }
}

impl HttpClient for StaticHttp {
    fn get_text(&self, request: &HttpRequest<'_>) -> anyhow::Result<String> {
        if let Ok(mut guard) = self.seen.lock() {
            guard.push((
                request.url.to_string(),
                request
                    .headers()
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ));
        }
        self.bodies
            .iter()
            .find(|(url, _)| url == request.url)
            .map(|(_, body)| body.clone())
            .ok_or_else(|| anyhow::anyhow!("404 Not Found: {}", request.url))
    }
}

/// Command context with real processes, in-memory log and HTTP double.
pub struct TestContext {
    pub log: Arc<MemoryLog>,
    pub http: Arc<StaticHttp>,
    pub ctx: Context,
}

impl TestContext {
    pub fn new(answer: bool, http: StaticHttp) -> Self {
        let log = Arc::new(MemoryLog::default());
        let http = Arc::new(http);
        let ctx = Context::new(
            Arc::clone(&log) as Arc<dyn Log>,
            Arc::new(SystemExecutor),
            Arc::clone(&http) as Arc<dyn HttpClient>,
            Arc::new(FixedAnswer(answer)),
        );
        Self { log, http, ctx }
    }
}

/// An isolated workspace backed by a [`tempfile::TempDir`].
///
/// `settings.local` points at `<root>/out` and `settings.repositories` at
/// `<root>/out/repositories`.
pub struct TestWorkspace {
    pub root: tempfile::TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Destination root for fetched output.
    pub fn out(&self) -> PathBuf {
        self.path().join("out")
    }

    /// Root for cloned repositories.
    pub fn repositories(&self) -> PathBuf {
        self.out().join("repositories")
    }

    /// Write a file under the workspace root and return its path.
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, contents).expect("write file");
        path
    }

    /// Start a manifest written to `<root>/<name>`.
    pub fn manifest(&self, name: &str) -> ManifestBuilder {
        ManifestBuilder {
            path: self.path().join(name),
            settings: Settings {
                local: self.out().to_string_lossy().into_owned(),
                repositories: self.repositories().to_string_lossy().into_owned(),
            },
            resources: Vec::new(),
        }
    }
}

/// Fluent builder for manifest files.
pub struct ManifestBuilder {
    path: PathBuf,
    settings: Settings,
    resources: Vec<ResourceEntry>,
}

impl ManifestBuilder {
    pub fn entry(mut self, entry: ResourceEntry) -> Self {
        self.resources.push(entry);
        self
    }

    pub fn write(self) -> PathBuf {
        let manifest = Manifest {
            settings: self.settings,
            resources: self.resources,
            ..Manifest::template()
        };
        manifest.save(&self.path).expect("save manifest");
        self.path
    }
}

/// Whether `git` is available for the repository tests.
pub fn git_available() -> bool {
    fetcher_cli::exec::which("git")
}
