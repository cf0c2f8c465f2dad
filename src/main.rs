//! CLI entry point for the point-cloud tile explorer

use clap::Parser;
use cloudgrid::io::cli::{Cli, GridExplorer};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> cloudgrid::Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let explorer = GridExplorer::new(cli);
    explorer.run().map(|_| ())
}
