use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;

use fetcher_cli::cli::Cli;
use fetcher_cli::commands::{self, Context, Outcome};
use fetcher_cli::http::HttpOptions;
use fetcher_cli::logging::{self, Logger};

fn main() -> Result<ExitCode> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let command = args.command_name();
    logging::init_subscriber(args.verbose, command);

    let log = Arc::new(Logger::new(command));
    let ctx = Context::system(
        log,
        HttpOptions {
            verify_tls: args.verify_tls,
        },
    );

    match commands::dispatch(&args.manifest, args.generate, args.clean, &ctx)? {
        Outcome::Done => Ok(ExitCode::SUCCESS),
        Outcome::Aborted => Ok(ExitCode::FAILURE),
    }
}
