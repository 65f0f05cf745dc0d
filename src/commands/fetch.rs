//! Command: fetch every active resource of a manifest.
use anyhow::{Context as _, Result};
use std::path::Path;

use super::{Context, Outcome, manifest_missing};
use crate::logging::FetchStatus;
use crate::manifest::{Manifest, ResourceEntry};
use crate::resources::{ResourceChange, Workspace, fetch_entry};

/// Load `manifest`, create the workspace roots and fetch each entry in
/// order.  The first failing entry stops the run.
///
/// # Errors
///
/// Returns an error if the manifest is invalid, a root cannot be created, or
/// any active entry fails to fetch.
pub fn run(manifest: &Path, ctx: &Context) -> Result<Outcome> {
    if manifest_missing(manifest, ctx) {
        return Ok(Outcome::Aborted);
    }
    let loaded = Manifest::load(manifest)?;
    let workspace = Workspace::from_settings(&loaded.settings);
    workspace.create()?;

    ctx.log.stage("Fetch resources...");
    let total = loaded.resources.len();
    for (index, entry) in loaded.resources.iter().enumerate() {
        let label = format!("{}/{total}", index + 1);
        ctx.log.info(&format!("Process {label}..."));
        let change = fetch_entry(entry, &workspace, ctx.backends())
            .with_context(|| format!("resource {label} ({})", describe(entry)))?;
        record(ctx, &label, entry, change);
    }

    ctx.log.summary();
    Ok(Outcome::Done)
}

fn describe(entry: &ResourceEntry) -> String {
    let kind = entry.kind.as_deref().unwrap_or("null");
    if entry.dst.is_empty() {
        kind.to_string()
    } else {
        format!("{kind} -> {}", entry.dst)
    }
}

fn record(ctx: &Context, label: &str, entry: &ResourceEntry, change: ResourceChange) {
    let name = format!("{label} {}", describe(entry));
    match change {
        ResourceChange::Inactive => {
            ctx.log.debug(&format!("{name}: inactive, skipped"));
            ctx.log.record(&name, FetchStatus::Inactive, None);
        }
        ResourceChange::Fetched => ctx.log.record(&name, FetchStatus::Fetched, None),
        ResourceChange::Cloned | ResourceChange::Updated => {
            let detail = change.to_string();
            ctx.log.record(&name, FetchStatus::Fetched, Some(detail.as_str()));
        }
    }
}
