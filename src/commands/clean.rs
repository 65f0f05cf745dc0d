//! Command: remove everything a manifest fetched.
use anyhow::Result;
use std::path::Path;

use super::{Context, Outcome, manifest_missing};
use crate::manifest::Manifest;
use crate::resources::Workspace;
use crate::resources::helpers::fs::remove_path;

/// Delete the `repositories` root, then the `local` root.  Missing
/// directories are not an error.
///
/// # Errors
///
/// Returns an error if the manifest is invalid or a directory cannot be
/// removed.
pub fn run(manifest: &Path, ctx: &Context) -> Result<Outcome> {
    if manifest_missing(manifest, ctx) {
        return Ok(Outcome::Aborted);
    }
    let loaded = Manifest::load(manifest)?;
    let workspace = Workspace::from_settings(&loaded.settings);

    ctx.log.stage("Remove fetched resources...");
    for root in [workspace.repositories_root(), workspace.local_root()] {
        ctx.log.debug(&format!("removing {}", root.display()));
        remove_path(root)?;
    }
    Ok(Outcome::Done)
}
