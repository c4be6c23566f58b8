use clap::Parser;
use tracing_subscriber::EnvFilter;

use vacancy_finder::commands;
use vacancy_finder::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("vacancy_finder=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    tracing::debug!("Using store at {}", config.store_path.display());

    commands::run(config).await
}
