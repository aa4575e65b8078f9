use anyhow::Result;
use clap::Parser;
use docsforai::cli::{run, Cli};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment (GITHUB_TOKEN, RUST_LOG)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // RUST_LOG wins; --debug only changes the default level.
    let default_level = if cli.debug {
        "info,docsforai=debug,docsforai_core=debug"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("CLI application startup: tracing initialised, environment loaded");

    let result = run(cli).await;
    match &result {
        Ok(_) => tracing::info!("CLI completed successfully"),
        Err(e) => tracing::error!(error = %e, "CLI exited with error"),
    }
    result
}
