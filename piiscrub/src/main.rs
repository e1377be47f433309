// piiscrub/src/main.rs
//! piiscrub entry point.
//!
//! Parses the command line, configures logging and dispatches to the command.

use anyhow::Result;
use clap::Parser;

use piiscrub::cli::{Cli, Commands};
use piiscrub::commands::{sanitize, scan};
use piiscrub::logger;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.quiet {
        logger::init_logger(Some(log::LevelFilter::Off));
    } else if cli.debug {
        logger::init_logger(Some(log::LevelFilter::Debug));
    } else {
        logger::init_logger(None);
    }

    match cli.command {
        Commands::Sanitize(cmd) => sanitize::run_sanitize_command(cmd, cli.quiet),
        Commands::Scan(cmd) => scan::run_scan_command(cmd, cli.quiet),
    }
}
