//! CLI type definitions: command enum and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "bgg-shelf")]
#[command(about = "Sync a BoardGameGeek collection into a searchable index", long_about = None)]
pub(crate) struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, global = true, default_value = "config.toml")]
    pub config: PathBuf,

    /// Only show warnings and errors (suppress normal output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose/debug logging (requests, cache hits, dropped links)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Download the collection, enrich it, and update the search index
    Sync(SyncArgs),
}

#[derive(Args, Clone)]
pub(crate) struct SyncArgs {
    /// Admin API key for the Algolia application
    #[arg(long, env = "ALGOLIA_API_KEY", hide_env_values = true)]
    pub apikey: Option<String>,

    /// Skip indexing in Algolia (useful while iterating on the download)
    #[arg(long)]
    pub no_indexing: bool,

    /// Cache every catalog response on disk for 24 hours
    #[arg(long)]
    pub cache_bgg: bool,

    /// Also write the enriched records to this JSON file
    #[arg(long)]
    pub dump: Option<PathBuf>,
}
