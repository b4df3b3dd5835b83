// Orchestrator for repository digests.
// Cache read, existence probe, ingestion, cache write-through, in that order.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::cache::{CachedDigest, DigestCache};
use crate::error::{DigestError, Result};
use crate::github::RepoProbe;
use crate::ingest::Ingestor;
use crate::types::RepoId;

/// Stateless front door over the cache, probe, and ingestor.
///
/// Concurrent requests for the same key may each run a full ingestion; there
/// is no single-flight coordination, and whichever finishes last owns the
/// cache entry. The atomic write in the store keeps that race corruption-free.
pub struct DigestService {
    cache: DigestCache,
    probe: Arc<dyn RepoProbe>,
    ingestor: Arc<dyn Ingestor>,
}

impl DigestService {
    pub fn new(
        cache: DigestCache,
        probe: Arc<dyn RepoProbe>,
        ingestor: Arc<dyn Ingestor>,
    ) -> Self {
        Self {
            cache,
            probe,
            ingestor,
        }
    }

    /// Fetch the digest for a repository, from cache when possible.
    ///
    /// A fresh cache hit is returned without revalidation. On a miss, or when
    /// `force_refresh` bypasses the cache, the repository must first answer
    /// the existence probe before the full ingestion runs. Only a successful
    /// ingestion touches the cache, so a failure here leaves any previously
    /// cached digest servable until its own expiry.
    pub async fn get_repo_data(
        &self,
        owner: &str,
        repo: &str,
        force_refresh: bool,
    ) -> Result<CachedDigest> {
        let id = RepoId::new(owner, repo)?;

        if !force_refresh {
            if let Some(entry) = self.cache.get(&id) {
                debug!(owner, repo, "serving digest from cache");
                return Ok(entry);
            }
        }

        let url = id.url();
        if !self.probe.exists(&url).await {
            return Err(DigestError::RepoNotFound);
        }

        info!(%url, "starting repository ingestion");
        let started = Instant::now();
        let digest = self.ingestor.ingest(&url).await?;
        info!(%url, elapsed = ?started.elapsed(), "repository ingestion complete");

        let entry = self
            .cache
            .put(&id, &digest)
            .map_err(|error| DigestError::Processing(format!("cache write failed: {error}")))?;
        Ok(entry)
    }

    /// Cache-only read; never triggers a probe or an ingestion.
    pub fn cached(&self, owner: &str, repo: &str) -> Result<Option<CachedDigest>> {
        let id = RepoId::new(owner, repo)?;
        Ok(self.cache.get(&id))
    }

    /// Existence probe for a repository, bypassing the cache.
    pub async fn exists(&self, owner: &str, repo: &str) -> Result<bool> {
        let id = RepoId::new(owner, repo)?;
        Ok(self.probe.exists(&id.url()).await)
    }
}
