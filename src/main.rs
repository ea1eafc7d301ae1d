//! Costforge CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use costforge::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Estimate(args) => costforge::cli::commands::estimate::execute(args, cli.json).await,
        Commands::Allocate(args) => costforge::cli::commands::allocate::execute(args, cli.json).await,
        Commands::Catalog(args) => costforge::cli::commands::catalog::execute(args, cli.json).await,
    };

    if let Err(err) = result {
        costforge::cli::handle_error(&err, cli.json);
    }
}
