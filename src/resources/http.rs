//! HTTP download resource.
use anyhow::{Context as _, Result};
use std::path::PathBuf;

use super::helpers::fs::ensure_parent_dir;
use super::{Resource, ResourceChange, Workspace};
use crate::error::ResourceError;
use crate::http::{HttpClient, HttpRequest};
use crate::manifest::ResourceEntry;

/// Downloads a text file with a GET request and writes it verbatim.
#[derive(Debug)]
pub struct HttpResource<'a> {
    /// URL to download.
    pub url: String,
    /// Destination path inside the `local` root.
    pub target: PathBuf,
    /// Optional `Accept` header.
    pub accept: Option<String>,
    /// Optional `Authorization` header.
    pub authorization: Option<String>,
    client: &'a dyn HttpClient,
}

impl<'a> HttpResource<'a> {
    /// Create from a manifest entry.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::MissingField`] if `src` is empty.
    pub fn from_entry(
        entry: &ResourceEntry,
        workspace: &Workspace,
        client: &'a dyn HttpClient,
    ) -> Result<Self, ResourceError> {
        if entry.src.is_empty() {
            return Err(ResourceError::MissingField {
                kind: "http",
                field: "src",
            });
        }
        Ok(Self {
            url: entry.src.clone(),
            target: workspace.local_path(&entry.dst),
            accept: entry.accept().map(str::to_string),
            authorization: entry.authorization().map(str::to_string),
            client,
        })
    }

    fn request(&self) -> HttpRequest<'_> {
        HttpRequest {
            url: &self.url,
            accept: self.accept.as_deref(),
            authorization: self.authorization.as_deref(),
        }
    }
}

impl Resource for HttpResource<'_> {
    fn description(&self) -> String {
        format!("{} -> {}", self.url, self.target.display())
    }

    fn fetch(&self) -> Result<ResourceChange> {
        let body = self.client.get_text(&self.request())?;
        ensure_parent_dir(&self.target)?;
        std::fs::write(&self.target, body)
            .with_context(|| format!("writing {}", self.target.display()))?;
        Ok(ResourceChange::Fetched)
    }
}
