use std::path::PathBuf;

use clap::Parser;

/// All options are optional; a bare `newsgrab` ingests the configured feed.
#[derive(Parser, Debug)]
#[command(name = "newsgrab")]
#[command(about = "Ingest a feed and store the full text of every linked article", long_about = None)]
pub struct Cli {
    /// Feed to ingest, overriding the configuration file
    #[arg(long, value_name = "URL")]
    pub feed: Option<String>,

    /// SQLite database file, overriding the configuration file
    #[arg(long, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Configuration file (default: ~/.config/newsgrab/config.toml)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
