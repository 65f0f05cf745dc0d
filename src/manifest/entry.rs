//! One element of the manifest `resources` sequence.
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ResourceError;

/// Closed set of resource types a manifest entry may name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Local file or directory copy.
    File,
    /// Git repository clone/update, optionally copying a sub-path.
    Git,
    /// HTTP download of a text file.
    Http,
}

impl ResourceKind {
    /// Manifest spelling of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Git => "git",
            Self::Http => "http",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceKind {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "git" => Ok(Self::Git),
            "http" => Ok(Self::Http),
            other => Err(ResourceError::UnsupportedType(other.to_string())),
        }
    }
}

/// Raw resource entry as stored in the manifest.
///
/// Every field except `accept` must be present, even when the type does not
/// use it; `type`, `repository` and `authorization` may be `null`.  The type
/// is kept as text so that a malformed value only fails when an active entry
/// is fetched, not when the manifest is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Inactive entries are skipped entirely.
    pub active: bool,
    /// Resource type (`file`, `git` or `http`).
    #[serde(rename = "type", deserialize_with = "nullable")]
    pub kind: Option<String>,
    /// Destination, relative to the workspace `local` root.
    pub dst: String,
    /// Source path or URL; meaning depends on the type.
    pub src: String,
    /// Git remote URL.
    #[serde(deserialize_with = "nullable")]
    pub repository: Option<String>,
    /// Value of the HTTP `Authorization` header.
    #[serde(deserialize_with = "nullable")]
    pub authorization: Option<String>,
    /// Value of the HTTP `Accept` header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
}

/// Deserialize a field that must be present but may be `null`.
fn nullable<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)
}

/// Treat empty strings like `null`.
fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.is_empty())
}

impl ResourceEntry {
    /// Inactive `file` entry copying `src` to `dst`.
    #[must_use]
    pub fn file(src: &str, dst: &str) -> Self {
        Self::with_kind(ResourceKind::File, src, dst)
    }

    /// Inactive `git` entry cloning `repository` and copying `src` to `dst`.
    #[must_use]
    pub fn git(repository: &str, src: &str, dst: &str) -> Self {
        Self {
            repository: Some(repository.to_string()),
            ..Self::with_kind(ResourceKind::Git, src, dst)
        }
    }

    /// Inactive `http` entry downloading `url` to `dst`.
    #[must_use]
    pub fn http(url: &str, dst: &str) -> Self {
        Self::with_kind(ResourceKind::Http, url, dst)
    }

    fn with_kind(kind: ResourceKind, src: &str, dst: &str) -> Self {
        Self {
            kind: Some(kind.as_str().to_string()),
            dst: dst.to_string(),
            src: src.to_string(),
            ..Self::default()
        }
    }

    /// Mark the entry active.
    #[must_use]
    pub fn activated(mut self) -> Self {
        self.active = true;
        self
    }

    /// Set the `Authorization` header value.
    #[must_use]
    pub fn with_authorization(mut self, authorization: &str) -> Self {
        self.authorization = Some(authorization.to_string());
        self
    }

    /// Set the `Accept` header value.
    #[must_use]
    pub fn with_accept(mut self, accept: &str) -> Self {
        self.accept = Some(accept.to_string());
        self
    }

    /// Parse the type discriminator.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::UnsupportedType`] for a missing or unknown type.
    pub fn resource_kind(&self) -> Result<ResourceKind, ResourceError> {
        self.kind.as_deref().map_or_else(
            || Err(ResourceError::UnsupportedType("null".to_string())),
            str::parse,
        )
    }

    /// Git remote URL, if set and non-empty.
    #[must_use]
    pub fn repository(&self) -> Option<&str> {
        non_empty(self.repository.as_ref())
    }

    /// Authorization header value, if set and non-empty.
    #[must_use]
    pub fn authorization(&self) -> Option<&str> {
        non_empty(self.authorization.as_ref())
    }

    /// Accept header value, if set and non-empty.
    #[must_use]
    pub fn accept(&self) -> Option<&str> {
        non_empty(self.accept.as_ref())
    }
}
