//! Declarative resource synchronizer.
//!
//! Reads a manifest (YAML or JSON) listing files, git repositories and HTTP
//! downloads, and makes a local workspace match it.
//!
//! - **[`manifest`]**: manifest model, format detection, load/save/template
//! - **[`resources`]**: per-entry fetch strategies (`file`, `git`, `http`)
//! - **[`commands`]**: `generate`, `fetch` and `clean`, plus flag dispatch
//! - **[`exec`]**, **[`http`]**, **[`prompt`]**: injectable adapters used
//!   by the commands
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod exec;
pub mod http;
pub mod logging;
pub mod manifest;
pub mod prompt;
pub mod resources;
