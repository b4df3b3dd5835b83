// Service configuration.
// Layered from an optional `gitdigest` config file and the environment.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Clone, Deserialize, Debug)]
pub struct AppConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
    /// Cache root; falls back to the platform cache directory when unset.
    #[serde(default)]
    pub cache_dir: Option<String>,
    /// Command invoked to perform the actual ingestion.
    #[serde(default = "default_ingest_command")]
    pub ingest_command: String,
    /// Timeout for the existence probe, in seconds.
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
}

fn default_http_port() -> u16 {
    8000
}

fn default_ingest_command() -> String {
    "gitingest-bridge".to_string()
}

fn default_probe_timeout_secs() -> u64 {
    10
}

pub fn get_config() -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::with_name("gitdigest").required(false))
        .add_source(Environment::with_prefix("GITDIGEST"))
        .build()?;

    config.try_deserialize()
}
