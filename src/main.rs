use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use newsgrab::app::AppContext;
use newsgrab::cli::Cli;
use newsgrab::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?.with_overrides(cli.feed, cli.db);
    let ctx = AppContext::new(config)?;

    ctx.run().await?;

    Ok(())
}
