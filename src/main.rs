use std::env;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use chemclub_site::{cli, config::SiteConfig, server};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = cli::parse(env::args().skip(1).collect());

    let config = SiteConfig::load(args.config.as_deref())?;
    info!(tracks = config.tracks.len(), "loaded schedule");

    let router = server::router(Arc::new(config));
    let listener = TcpListener::bind(args.address)
        .await
        .with_context(|| format!("failed to bind {}", args.address))?;
    info!("listening on http://{}", args.address);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutting down");
}
