mod cli;
mod config;
mod download;
mod parse;
mod series;
mod status;

use std::process;

use anyhow::Result;
use clap::Parser;
use tracing::error;

use cli::{command, Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level)
        .init();

    if let Err(failure) = run(cli).await {
        error!("{failure:#}");
        process::exit(exit_code(&failure));
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Fetch(args) => command::fetch(&args.into_config()).await,
        Commands::Archive(args) => command::archive(&args.hourly, &args.out),
    }
}

/// Exit 2 marks a page that no longer yields any observation; everything
/// else exits 1.
fn exit_code(failure: &anyhow::Error) -> i32 {
    let nothing_extracted = failure.chain().any(|cause| {
        matches!(
            cause.downcast_ref::<parse::Error>(),
            Some(parse::Error::NoObservations)
        )
    });
    if nothing_extracted {
        2
    } else {
        1
    }
}

// -- Tests -------------------------------------------------------------------
