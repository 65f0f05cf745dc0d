use clap::Parser;
use std::path::PathBuf;

/// Fetch files, git repositories and HTTP downloads described by a
/// resources file into a local workspace.
#[derive(Parser, Debug)]
#[command(name = "fetcher", version)]
pub struct Cli {
    /// Resources file (.yaml, .yml or .json)
    #[arg(value_name = "RESOURCES")]
    pub manifest: PathBuf,

    /// Generate a new resources file template
    #[arg(short, long)]
    pub generate: bool,

    /// Remove fetched resources
    #[arg(short, long)]
    pub clean: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Verify TLS certificates of HTTP resources
    #[arg(long)]
    pub verify_tls: bool,
}

impl Cli {
    /// Name of the log file for this invocation.
    #[must_use]
    pub const fn command_name(&self) -> &'static str {
        match (self.generate, self.clean) {
            (true, false) => "generate",
            (false, true) => "clean",
            _ => "fetch",
        }
    }
}
