//! Command: write a template manifest.
use anyhow::Result;
use std::path::Path;

use super::{Context, Outcome};
use crate::manifest::Manifest;

/// Write a template manifest to `manifest`, asking before overwriting an
/// existing file.
///
/// # Errors
///
/// Returns an error if the prompt cannot be answered or the file cannot be
/// written.
pub fn run(manifest: &Path, ctx: &Context) -> Result<Outcome> {
    if manifest.exists() {
        ctx.log.warn("Resources file already exists.");
        if !ctx
            .prompt
            .confirm("Do you want to overwrite existing with new file?")?
        {
            return Ok(Outcome::Aborted);
        }
    }

    ctx.log.stage("Generate new resources file...");
    Manifest::template().save(manifest)?;
    ctx.log.debug(&format!("wrote {}", manifest.display()));
    Ok(Outcome::Done)
}
