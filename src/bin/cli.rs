// Command-line bridge.
// Same orchestration as the HTTP service, printing the JSON envelope on
// stdout for callers that shell out instead of speaking HTTP.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde_json::json;

use gitdigest::cache::{DigestCache, default_cache_dir};
use gitdigest::config::get_config;
use gitdigest::github::GithubProbe;
use gitdigest::ingest::BridgeIngestor;
use gitdigest::service::DigestService;

#[derive(Parser)]
#[command(
    name = "gitdigest-cli",
    about = "Fetch an LLM-ready digest of a GitHub repository"
)]
struct Args {
    /// Repository owner.
    #[arg(long, alias = "username")]
    owner: String,

    /// Repository name.
    #[arg(long)]
    repo: String,

    /// Bypass the cache and re-ingest.
    #[arg(long)]
    force: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match fetch(&args).await {
        Ok(data) => {
            println!("{}", json!({ "success": true, "data": data }));
            ExitCode::SUCCESS
        }
        Err(error) => {
            println!("{}", json!({ "success": false, "error": error }));
            ExitCode::FAILURE
        }
    }
}

async fn fetch(args: &Args) -> Result<serde_json::Value, String> {
    let config = get_config().map_err(|error| format!("config error: {error}"))?;

    let cache_root = match &config.cache_dir {
        Some(dir) => PathBuf::from(dir),
        None => default_cache_dir().ok_or_else(|| "no cache directory available".to_string())?,
    };

    let probe = GithubProbe::new(Duration::from_secs(config.probe_timeout_secs))
        .map_err(|error| format!("http client error: {error}"))?;
    let service = DigestService::new(
        DigestCache::new(cache_root),
        Arc::new(probe),
        Arc::new(BridgeIngestor::new(config.ingest_command.clone())),
    );

    let entry = service
        .get_repo_data(&args.owner, &args.repo, args.force)
        .await
        .map_err(|error| error.code())?;

    serde_json::to_value(&entry).map_err(|error| format!("serialization error: {error}"))
}
