// Ingestion adapter module.
// Wraps the external ingestion bridge and normalizes its failures into the
// closed error vocabulary.

pub mod bridge;
pub mod gate;

pub use bridge::BridgeIngestor;

use async_trait::async_trait;

use crate::error::{DigestError, Result};
use crate::types::RepoDigest;

/// Paths excluded from every ingestion. Test and documentation trees inflate
/// the token ceiling without adding value to an LLM-facing digest.
pub const EXCLUDED_PATHS: &[&str] = &["tests/*", "docs/*"];

/// Ingestion seam, mockable in tests.
#[async_trait]
pub trait Ingestor: Send + Sync {
    async fn ingest(&self, repo_url: &str) -> Result<RepoDigest>;
}

/// Ordered failure-classification rules: first case-insensitive substring
/// match wins. Upstream message text is not a stable contract, but callers
/// match on the resulting codes, so any change here is an observable
/// behavior change.
const FAILURE_RULES: &[(&str, DigestError)] = &[
    ("not found", DigestError::RepoNotFound),
    ("bad credentials", DigestError::RepoPrivateOrRateLimited),
    ("rate limit", DigestError::RepoPrivateOrRateLimited),
];

/// Map an upstream failure message onto the error vocabulary.
pub fn classify_failure(message: &str) -> DigestError {
    let lowered = message.to_lowercase();
    for (pattern, code) in FAILURE_RULES {
        if lowered.contains(pattern) {
            return code.clone();
        }
    }
    DigestError::Processing(message.to_string())
}
