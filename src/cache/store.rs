// Cache store for repository digests.
// JSON files with a stored-at stamp, a 6 hour TTL, and atomic replacement.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::types::{RepoDigest, RepoId};

use super::paths::digest_path;

/// How long a cached digest stays servable: 6 hours.
pub const DEFAULT_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// Storage-level failures. Reads never surface these to callers; writes do.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A digest plus the moment it was stored. The serialized shape is the digest
/// fields with a `timestamp` alongside, which is also the API payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedDigest {
    #[serde(flatten)]
    pub digest: RepoDigest,
    pub timestamp: DateTime<Utc>,
}

impl CachedDigest {
    fn age_at(&self, now: DateTime<Utc>) -> Duration {
        now.signed_duration_since(self.timestamp)
            .to_std()
            .unwrap_or(Duration::MAX)
    }
}

type Clock = fn() -> DateTime<Utc>;

/// Keyed, time-expiring store mapping a repository to its last good digest.
/// The clock is injected so expiry is deterministic under test.
pub struct DigestCache {
    root: PathBuf,
    ttl: Duration,
    now: Clock,
}

impl DigestCache {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ttl: DEFAULT_TTL,
            now: Utc::now,
        }
    }

    pub fn with_clock(root: PathBuf, ttl: Duration, now: Clock) -> Self {
        Self { root, ttl, now }
    }

    /// Read the entry for a key. Absent, expired, and unreadable entries all
    /// come back as `None`; a corrupt file must degrade to a miss so a fresh
    /// ingestion can replace it. Expired entries are left on disk.
    pub fn get(&self, id: &RepoId) -> Option<CachedDigest> {
        let path = digest_path(&self.root, id);
        if !path.exists() {
            return None;
        }

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(error) => {
                warn!(path = %path.display(), %error, "unreadable cache entry");
                return None;
            }
        };

        let entry: CachedDigest = match serde_json::from_str(&contents) {
            Ok(entry) => entry,
            Err(error) => {
                warn!(path = %path.display(), %error, "malformed cache entry");
                return None;
            }
        };

        if entry.age_at((self.now)()) >= self.ttl {
            debug!(owner = %id.owner, repo = %id.name, "cache entry expired");
            return None;
        }

        Some(entry)
    }

    /// Store a digest for a key, stamped with the current time, replacing any
    /// prior entry. The write goes through a temp file and rename so a
    /// concurrent reader never sees a partial entry.
    pub fn put(&self, id: &RepoId, digest: &RepoDigest) -> Result<CachedDigest, CacheError> {
        let entry = CachedDigest {
            digest: digest.clone(),
            timestamp: (self.now)(),
        };

        let path = digest_path(&self.root, id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&entry)?;

        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        Ok(entry)
    }
}
