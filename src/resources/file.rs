//! Local file or directory resource.
use anyhow::Result;
use std::path::PathBuf;

use super::helpers::fs::copy_path;
use super::{Resource, ResourceChange, Workspace};
use crate::error::ResourceError;
use crate::manifest::ResourceEntry;

/// Copies a local file or directory into the workspace.
#[derive(Debug, Clone)]
pub struct FileResource {
    /// Source path (absolute, or relative to the working directory).
    pub source: PathBuf,
    /// Destination path inside the `local` root.
    pub target: PathBuf,
}

impl FileResource {
    /// Create a new file resource.
    #[must_use]
    pub const fn new(source: PathBuf, target: PathBuf) -> Self {
        Self { source, target }
    }

    /// Create from a manifest entry.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingField`] if `src` is empty.
    pub fn from_entry(entry: &ResourceEntry, workspace: &Workspace) -> Result<Self, ResourceError> {
        if entry.src.is_empty() {
            return Err(ResourceError::MissingField {
                kind: "file",
                field: "src",
            });
        }
        Ok(Self::new(
            PathBuf::from(&entry.src),
            workspace.local_path(&entry.dst),
        ))
    }
}

impl Resource for FileResource {
    fn description(&self) -> String {
        format!("{} -> {}", self.source.display(), self.target.display())
    }

    fn fetch(&self) -> Result<ResourceChange> {
        copy_path(&self.source, &self.target)?;
        Ok(ResourceChange::Fetched)
    }
}
