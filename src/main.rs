mod body;
mod cli;
mod config;
mod converter;
mod docx_file;
mod error;
mod figures;
mod headings;
mod paragraph;
mod pipeline;
mod styles;
mod urls;

use anyhow::Result;
use clap::Parser;
use std::io;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(cli.verbose);
    converter::convert(&cli)
}

/// `RUST_LOG` wins; otherwise each `-v` raises the level one step from warn.
fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();
}
