//! Manifest text formats, selected by file extension.
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

use crate::error::ManifestError;

/// Structured-text encodings accepted for the manifest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// `.yaml` / `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl ManifestFormat {
    /// Detect the format from the extension of `path` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self, ManifestError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        match ext.as_deref() {
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(ManifestError::UnsupportedFormat {
                file: path.display().to_string(),
            }),
        }
    }

    /// Decode `text` into `T`.
    pub(super) fn decode<T: DeserializeOwned>(self, text: &str) -> Result<T, String> {
        match self {
            Self::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        }
    }

    /// Encode `value`, always terminated by a newline.
    pub(super) fn encode<T: Serialize>(self, value: &T) -> Result<String, String> {
        match self {
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| e.to_string()),
            Self::Json => serde_json::to_string_pretty(value)
                .map(|mut s| {
                    s.push('\n');
                    s
                })
                .map_err(|e| e.to_string()),
        }
    }
}
