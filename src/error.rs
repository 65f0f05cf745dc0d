//! Domain-specific error types for the resource fetcher.
//!
//! Manifest, resource and transport code return these typed errors. Command
//! handlers convert them to [`anyhow::Error`] with `?` and add context, and
//! tests recover them with `downcast_ref`.
//!
//! - [`ManifestError`]: format detection, parsing, required sections
//! - [`ResourceError`]: unsupported types, malformed entries, git failures
//! - [`TransportError`]: HTTP request and body failures

use thiserror::Error;

/// Errors that arise from loading, validating and storing the manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// A required top-level section is absent from the manifest.
    #[error("Can not find toplevel key '{section}' in {file}")]
    MissingSection {
        /// Name of the missing section (`meta`, `settings` or `resources`).
        section: &'static str,
        /// Path of the manifest file.
        file: String,
    },

    /// The manifest file extension does not map to a known format.
    #[error("Unsupported manifest file ending of {file}: use .yaml, .yml or .json")]
    UnsupportedFormat {
        /// Path of the manifest file.
        file: String,
    },

    /// The manifest contents could not be decoded.
    #[error("Invalid manifest {file}: {message}")]
    Parse {
        /// Path of the manifest file.
        file: String,
        /// Decoder message.
        message: String,
    },

    /// The manifest could not be encoded for writing.
    #[error("Failed to serialize manifest {file}: {message}")]
    Serialize {
        /// Path of the manifest file.
        file: String,
        /// Encoder message.
        message: String,
    },

    /// An I/O error occurred while reading or writing the manifest.
    #[error("IO error on manifest file {path}: {source}")]
    Io {
        /// Path to the file that could not be read or written.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise while turning a manifest entry into a fetched resource.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The entry names a resource type outside `file`, `git`, `http`.
    #[error("Resource type '{0}' is not supported")]
    UnsupportedType(String),

    /// A field required by the resource type is empty or null.
    #[error("Resource of type '{kind}' requires a non-empty '{field}'")]
    MissingField {
        /// Resource type of the entry.
        kind: &'static str,
        /// Name of the missing field.
        field: &'static str,
    },

    /// The repository URL has no usable last path segment.
    #[error("Can not derive repository name from '{0}'")]
    InvalidRepository(String),

    /// A command invoked by a resource failed with a non-zero exit code.
    #[error("command '{program}' failed (exit {exit_code}): {stderr}")]
    ExecutionFailed {
        /// Command line that was invoked.
        program: String,
        /// Exit code returned by the process (`-1` when killed by a signal).
        exit_code: i32,
        /// Captured standard error output.
        stderr: String,
    },
}

/// Errors that arise from HTTP transfers.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be sent or returned a non-success status.
    #[error("HTTP GET {url} failed: {message}")]
    Request {
        /// Requested URL.
        url: String,
        /// Transport message.
        message: String,
    },

    /// The response body could not be read.
    #[error("Failed to read response body from {url}: {message}")]
    Body {
        /// Requested URL.
        url: String,
        /// Transport message.
        message: String,
    },
}
