//! Wayfinder CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wayfinder::cli::{Cli, Commands};
use wayfinder::infrastructure::config::ConfigLoader;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.config.as_ref() {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(err) => wayfinder::cli::handle_error(err.into(), cli.json),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let result = match cli.command {
        Commands::Search(args) => {
            wayfinder::cli::commands::search::execute(args, &config, cli.json).await
        }
        Commands::Ls(args) => wayfinder::cli::commands::ls::execute(args, &config, cli.json).await,
        Commands::Resolve(args) => {
            wayfinder::cli::commands::resolve::execute(args, &config, cli.json).await
        }
    };

    if let Err(err) = result {
        wayfinder::cli::handle_error(err, cli.json);
    }
}
