// Subprocess bridge to the external ingestion library.
// The bridge command clones and scans the repository, printing the digest as
// JSON on stdout; failure text on stderr is classified here.

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{DigestError, Result};
use crate::types::RepoDigest;

use super::gate::enforce_size_gate;
use super::{EXCLUDED_PATHS, Ingestor, classify_failure};

/// Ingestor that shells out to a bridge command. The bridge owns cloning,
/// traversal, and its own timeouts; no additional deadline is imposed here.
pub struct BridgeIngestor {
    command: String,
}

impl BridgeIngestor {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl Ingestor for BridgeIngestor {
    async fn ingest(&self, repo_url: &str) -> Result<RepoDigest> {
        let mut command = Command::new(&self.command);
        command.arg("--url").arg(repo_url);
        for pattern in EXCLUDED_PATHS {
            command.arg("--exclude").arg(pattern);
        }

        let output = command.output().await.map_err(|error| {
            DigestError::Processing(format!("failed to run {}: {error}", self.command))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = stderr.trim();
            if message.is_empty() {
                let fallback = format!("{} exited with {}", self.command, output.status);
                return Err(classify_failure(&fallback));
            }
            return Err(classify_failure(message));
        }

        let digest: RepoDigest = serde_json::from_slice(&output.stdout)
            .map_err(|error| DigestError::Processing(format!("malformed bridge output: {error}")))?;

        enforce_size_gate(&digest.summary)?;
        Ok(digest)
    }
}
