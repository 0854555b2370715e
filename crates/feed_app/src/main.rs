use std::path::PathBuf;

use clap::Parser;

mod platform;

use platform::config::AppConfig;
use platform::logging::LogDestination;

#[derive(Parser, Debug)]
#[command(name = "feed_app", about = "Browse the kept and discarded feeds in a terminal")]
struct Cli {
    /// Base URL of the feed server.
    #[arg(long)]
    server: Option<String>,

    /// RON configuration file (defaults to ./feed_app.ron when present).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Where log output goes.
    #[arg(long, value_enum)]
    log: Option<LogDestination>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(server) = cli.server {
        config.server.base_url = server;
    }
    if let Some(destination) = cli.log {
        config.logging.destination = destination;
    }

    platform::run_app(config)
}
