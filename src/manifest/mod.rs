//! Manifest model: `meta`, `settings` and the ordered `resources` list.
pub mod entry;
pub mod format;

pub use entry::{ResourceEntry, ResourceKind};
pub use format::ManifestFormat;

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::error::ManifestError;

/// Top-level key holding descriptive information.
pub const META: &str = "meta";
/// Top-level key holding workspace paths.
pub const SETTINGS: &str = "settings";
/// Top-level key holding the resource list.
pub const RESOURCES: &str = "resources";

/// Default workspace root for fetched output.
pub const DEFAULT_LOCAL: &str = "./local/";
/// Default workspace root for cloned repositories.
pub const DEFAULT_REPOSITORIES: &str = "./local/repositories/";

/// Advisory information about who created the manifest and when.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    /// Free-form description.
    pub info: String,
    /// Creation time, `YYYY-MM-DDThh:mm:ss`.
    pub date: String,
    /// Creating user.
    pub user: String,
    /// Anything else worth knowing.
    pub note: String,
}

impl Meta {
    /// Fresh metadata stamped with the current local time and user.
    #[must_use]
    pub fn generate() -> Self {
        Self {
            info: "Fetcher resources file.".to_string(),
            date: timestamp(),
            user: current_user(),
            note: String::new(),
        }
    }
}

/// The `meta` section.  Only its presence is required; any value is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaSection {
    /// The usual `info`/`date`/`user`/`note` mapping.
    Fields(Meta),
    /// Any other value, including null.
    Free(serde_yaml::Value),
}

impl MetaSection {
    /// The structured fields, if the section has that shape.
    #[must_use]
    pub const fn fields(&self) -> Option<&Meta> {
        match self {
            Self::Fields(meta) => Some(meta),
            Self::Free(_) => None,
        }
    }
}

/// Workspace roots, as written in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Root for fetched output.
    pub local: String,
    /// Root for cloned repositories.
    pub repositories: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            local: DEFAULT_LOCAL.to_string(),
            repositories: DEFAULT_REPOSITORIES.to_string(),
        }
    }
}

/// A complete, validated manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Advisory metadata.
    pub meta: MetaSection,
    /// Workspace roots.
    pub settings: Settings,
    /// Entries, fetched in document order.
    pub resources: Vec<ResourceEntry>,
}

/// Manifest as decoded, before the required sections are checked.
#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default, deserialize_with = "present")]
    meta: Option<MetaSection>,
    settings: Option<Settings>,
    resources: Option<Vec<ResourceEntry>>,
}

/// `Some` whenever the key exists, even if its value is null.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl Manifest {
    /// Template manifest with one inactive example entry per resource type.
    #[must_use]
    pub fn template() -> Self {
        Self {
            meta: MetaSection::Fields(Meta::generate()),
            settings: Settings::default(),
            resources: vec![
                ResourceEntry::file("file_path/remote_file.txt", "local_file.txt"),
                ResourceEntry::git(
                    "ssh://git@server/project/repository.git",
                    "file_path_in_repository/remote_file.txt",
                    "local_file.txt",
                ),
                ResourceEntry::http("url_to_file", "local_file.txt"),
            ],
        }
    }

    /// Load and validate the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is unsupported, the file cannot be
    /// read or decoded, or any of `meta`, `settings`, `resources` is missing.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let format = ManifestFormat::from_path(path)?;
        let file = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: file.clone(),
            source,
        })?;
        Self::parse(&text, format, &file)
    }

    /// Decode and validate manifest text.  `file` is only used in messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the text cannot be decoded or a section is missing.
    pub fn parse(text: &str, format: ManifestFormat, file: &str) -> Result<Self, ManifestError> {
        let raw: RawManifest = format.decode(text).map_err(|message| ManifestError::Parse {
            file: file.to_string(),
            message,
        })?;

        let missing = |section| ManifestError::MissingSection {
            section,
            file: file.to_string(),
        };
        let meta = raw.meta.ok_or_else(|| missing(META))?;
        let settings = raw.settings.ok_or_else(|| missing(SETTINGS))?;
        let resources = raw.resources.ok_or_else(|| missing(RESOURCES))?;

        Ok(Self {
            meta,
            settings,
            resources,
        })
    }

    /// Serialize the manifest in the format implied by `path` and write it,
    /// creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is unsupported, encoding fails, or
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let format = ManifestFormat::from_path(path)?;
        let file = path.display().to_string();
        let text = format
            .encode(self)
            .map_err(|message| ManifestError::Serialize {
                file: file.clone(),
                message,
            })?;
        let io_err = |source| ManifestError::Io {
            path: file.clone(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        std::fs::write(path, text).map_err(io_err)
    }
}

/// Local time as `YYYY-MM-DDThh:mm:ss`.
fn timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Name of the current OS user, read from the environment.
fn current_user() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .find_map(|var| std::env::var(var).ok().filter(|v| !v.is_empty()))
        .unwrap_or_else(|| "unknown".to_string())
}
