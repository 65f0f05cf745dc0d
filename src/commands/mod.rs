//! Top-level operations: generate, fetch and clean.
pub mod clean;
pub mod fetch;
pub mod generate;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::exec::{Executor, SystemExecutor};
use crate::http::{HttpClient, HttpOptions, UreqClient};
use crate::logging::Log;
use crate::manifest::ManifestFormat;
use crate::prompt::{Prompt, StdinPrompt};
use crate::resources::Backends;

/// Collaborators shared by every command.
pub struct Context {
    /// Logger for output and summary recording.
    pub log: Arc<dyn Log>,
    /// Runs `git`.
    pub executor: Arc<dyn Executor>,
    /// Performs HTTP downloads.
    pub http: Arc<dyn HttpClient>,
    /// Answers the overwrite question of `generate`.
    pub prompt: Arc<dyn Prompt>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("log", &"<dyn Log>")
            .field("executor", &self.executor)
            .field("http", &self.http)
            .field("prompt", &self.prompt)
            .finish()
    }
}

impl Context {
    /// Create a context from explicit collaborators.
    #[must_use]
    pub fn new(
        log: Arc<dyn Log>,
        executor: Arc<dyn Executor>,
        http: Arc<dyn HttpClient>,
        prompt: Arc<dyn Prompt>,
    ) -> Self {
        Self {
            log,
            executor,
            http,
            prompt,
        }
    }

    /// Context backed by real processes, network and terminal.
    #[must_use]
    pub fn system(log: Arc<dyn Log>, options: HttpOptions) -> Self {
        Self::new(
            log,
            Arc::new(SystemExecutor),
            Arc::new(UreqClient::new(options)),
            Arc::new(StdinPrompt),
        )
    }

    /// Borrow the transport adapters for resource fetches.
    #[must_use]
    pub fn backends(&self) -> Backends<'_> {
        Backends {
            executor: self.executor.as_ref(),
            http: self.http.as_ref(),
            log: self.log.as_ref(),
        }
    }
}

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The requested operation completed.
    Done,
    /// A precondition failed or the user declined; nothing was changed.
    Aborted,
}

/// Operation selected by the command-line flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Write a template manifest.
    Generate,
    /// Fetch every active resource.
    Fetch,
    /// Delete the workspace roots.
    Clean,
}

impl Mode {
    /// Select the mode, or `None` when both flags are given.
    #[must_use]
    pub const fn from_flags(generate: bool, clean: bool) -> Option<Self> {
        match (generate, clean) {
            (true, true) => None,
            (true, false) => Some(Self::Generate),
            (false, true) => Some(Self::Clean),
            (false, false) => Some(Self::Fetch),
        }
    }
}

/// Run the operation selected by `generate` and `clean` on `manifest`,
/// reporting `Done.` or `Abort.` at the end.
///
/// # Errors
///
/// Returns an error if the manifest is unusable or any step fails; `Abort.`
/// is reported before the error is returned.
pub fn dispatch(manifest: &Path, generate: bool, clean: bool, ctx: &Context) -> Result<Outcome> {
    let log = ctx.log.as_ref();
    log.info(&format!("Resources file: {}", manifest.display()));

    let result = run(manifest, generate, clean, ctx);
    match &result {
        Ok(Outcome::Done) => log.info("Done."),
        Ok(Outcome::Aborted) | Err(_) => log.info("Abort."),
    }
    result
}

fn run(manifest: &Path, generate: bool, clean: bool, ctx: &Context) -> Result<Outcome> {
    let Some(mode) = Mode::from_flags(generate, clean) else {
        ctx.log
            .error("Options --generate and --clean can not be used together.");
        return Ok(Outcome::Aborted);
    };
    ManifestFormat::from_path(manifest)?;

    match mode {
        Mode::Generate => generate::run(manifest, ctx),
        Mode::Fetch => fetch::run(manifest, ctx),
        Mode::Clean => clean::run(manifest, ctx),
    }
}

/// Report a missing manifest; shared by fetch and clean.
fn manifest_missing(manifest: &Path, ctx: &Context) -> bool {
    if manifest.is_file() {
        return false;
    }
    ctx.log.error(&format!(
        "Resources file {} does not exist.",
        manifest.display()
    ));
    true
}
