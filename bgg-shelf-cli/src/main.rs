//! bgg-shelf CLI
//!
//! Downloads a BoardGameGeek collection, enriches it into one record per
//! owned edition, and pushes the result to a search index.

mod cli_types;
mod commands;
mod config;
mod error;

use std::io::Write;

use clap::Parser;
use log::{Level, LevelFilter};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stderr;

use cli_types::{Cli, Commands};

fn init_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| match record.level() {
            Level::Error => writeln!(
                buf,
                "{} {}",
                "error:".if_supports_color(Stderr, |t| t.red()),
                record.args()
            ),
            Level::Warn => writeln!(
                buf,
                "{} {}",
                "warning:".if_supports_color(Stderr, |t| t.yellow()),
                record.args()
            ),
            Level::Info => writeln!(buf, "{}", record.args()),
            Level::Debug | Level::Trace => writeln!(
                buf,
                "{} {}",
                record.target().if_supports_color(Stderr, |t| t.dimmed()),
                record.args()
            ),
        })
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Sync(args) => commands::sync::run_sync(&cli.config, args),
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
