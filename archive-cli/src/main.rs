//! Binary crate for the `weather-archive` command-line tool.
//!
//! Parses arguments, sets up tracing on stderr and writes the report to
//! stdout.

use std::process;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod cli;

/// `-v` steps the default level from warn up to trace; `RUST_LOG` wins when
/// set.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose > 1)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cmd = cli::Cli::parse();
    init_tracing(cmd.verbose);

    if let Err(e) = cmd.run().await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
