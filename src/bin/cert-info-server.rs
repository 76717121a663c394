//! Certificate Info Server - exposes the served certificate chain as JSON

use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;
use trust_chain_validator::server::create_app;
use trust_chain_validator::{ServerCli, Settings};

#[tokio::main]
async fn main() {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = ServerCli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: ServerCli) -> anyhow::Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    let app = create_app(settings.server);

    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    tracing::info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
