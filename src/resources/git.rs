//! Git repository resource.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::helpers::fs::{copy_path, remove_path};
use super::{Resource, ResourceChange, Workspace};
use crate::error::ResourceError;
use crate::exec::{ExecResult, Executor};
use crate::logging::Log;
use crate::manifest::ResourceEntry;

/// Clones or updates a repository under the `repositories` root and
/// optionally copies a path from it into the `local` root.
///
/// The repository directory doubles as the cache: if it exists it is reset
/// and pulled, otherwise it is cloned.
pub struct GitResource<'a> {
    /// Remote URL.
    pub repository: String,
    /// Root the repository is cloned into.
    pub repositories_root: PathBuf,
    /// Working tree of the clone.
    pub repository_path: PathBuf,
    /// `(source inside the clone, destination)`, when both are set.
    pub copy: Option<(PathBuf, PathBuf)>,
    executor: &'a dyn Executor,
    log: &'a dyn Log,
}

impl std::fmt::Debug for GitResource<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitResource")
            .field("repository", &self.repository)
            .field("repository_path", &self.repository_path)
            .field("copy", &self.copy)
            .finish_non_exhaustive()
    }
}

impl<'a> GitResource<'a> {
    /// Create from a manifest entry.
    ///
    /// # Errors
    ///
    /// Returns an error if `repository` is empty or has no usable name.
    pub fn from_entry(
        entry: &ResourceEntry,
        workspace: &Workspace,
        executor: &'a dyn Executor,
        log: &'a dyn Log,
    ) -> Result<Self, ResourceError> {
        let repository = entry.repository().ok_or(ResourceError::MissingField {
            kind: "git",
            field: "repository",
        })?;
        let name = repository_name(repository)
            .ok_or_else(|| ResourceError::InvalidRepository(repository.to_string()))?;
        let repository_path = workspace.repository_path(name);

        let copy = (!entry.src.is_empty() && !entry.dst.is_empty()).then(|| {
            (
                PathBuf::from(format!("{}/{}", repository_path.display(), entry.src)),
                workspace.local_path(&entry.dst),
            )
        });

        Ok(Self {
            repository: repository.to_string(),
            repositories_root: workspace.repositories_root().to_path_buf(),
            repository_path,
            copy,
            executor,
            log,
        })
    }

    fn git_in_repository(&self, args: &[&str]) -> Result<()> {
        let result = self
            .executor
            .run_in(&self.repository_path, "git", args)
            .with_context(|| format!("updating {}", self.repository_path.display()))?;
        self.log_output(&result);
        Ok(())
    }

    /// Forward git's own output to the debug log.
    fn log_output(&self, result: &ExecResult) {
        for stream in [&result.stdout, &result.stderr] {
            let text = stream.trim();
            if !text.is_empty() {
                self.log.debug(text);
            }
        }
    }
}

/// Directory name for a remote: the last path segment without `.git`.
///
/// # Examples
///
/// ```
/// use fetcher_cli::resources::git::repository_name;
///
/// assert_eq!(repository_name("ssh://git@server/project/repository.git"), Some("repository"));
/// assert_eq!(repository_name("https://host/org/tool/"), Some("tool"));
/// assert_eq!(repository_name("https://host/org/.git"), None);
/// ```
#[must_use]
pub fn repository_name(url: &str) -> Option<&str> {
    let segment = url.trim_end_matches('/').rsplit(['/', ':']).next()?;
    let name = segment.strip_suffix(".git").unwrap_or(segment);
    (!name.is_empty()).then_some(name)
}

impl Resource for GitResource<'_> {
    fn description(&self) -> String {
        match &self.copy {
            Some((src, dst)) => format!("{} ({} -> {})", self.repository, src.display(), dst.display()),
            None => self.repository.clone(),
        }
    }

    fn fetch(&self) -> Result<ResourceChange> {
        let change = if self.repository_path.is_dir() {
            ResourceChange::Updated
        } else {
            remove_path(&self.repository_path)?;
            let name = self
                .repository_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let result = self
                .executor
                .run_in(
                    &self.repositories_root,
                    "git",
                    &["clone", &self.repository, &name],
                )
                .with_context(|| format!("cloning {}", self.repository))?;
            self.log_output(&result);
            ResourceChange::Cloned
        };

        self.git_in_repository(&["reset", "--hard"])?;
        self.git_in_repository(&["pull", "--prune"])?;
        self.git_in_repository(&["submodule", "update", "--init", "--recursive"])?;

        if let Some((src, dst)) = &self.copy {
            copy_path(src, dst)?;
        }
        Ok(change)
    }
}
