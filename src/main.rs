// Service entry point.
// Wires config, cache, probe, and bridge into the axum server.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use gitdigest::cache::{DigestCache, default_cache_dir};
use gitdigest::config::get_config;
use gitdigest::github::GithubProbe;
use gitdigest::ingest::BridgeIngestor;
use gitdigest::server::{AppState, router};
use gitdigest::service::DigestService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    let config = get_config()?;

    let cache_root = match &config.cache_dir {
        Some(dir) => PathBuf::from(dir),
        None => default_cache_dir().ok_or("no cache directory available")?,
    };

    let probe = GithubProbe::new(Duration::from_secs(config.probe_timeout_secs))?;
    let ingestor = BridgeIngestor::new(config.ingest_command.clone());
    let cache = DigestCache::new(cache_root.clone());
    let service = DigestService::new(cache, Arc::new(probe), Arc::new(ingestor));

    let app = router(AppState {
        service: Arc::new(service),
    });

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, cache = %cache_root.display(), "gitdigest listening");
    axum::serve(listener, app).await?;

    Ok(())
}
