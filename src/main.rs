use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use oxify::cli::{Cli, USAGE};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    init_tracing();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => {
            // Wrong argument count or shape: usage, exit 1, no I/O
            println!("{USAGE}");
            std::process::exit(1);
        }
    };

    let ctx = cli.context();
    oxify::core::merge_run(cli.merge, &ctx)
}

/// Structured logging to stderr; `OXIFY_LOG` wins over `RUST_LOG`
fn init_tracing() {
    let filter = EnvFilter::try_from_env("OXIFY_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
