// Core data model: repository identity and the digest payload.

use serde::{Deserialize, Serialize};

use crate::error::{DigestError, Result};

/// Identity of a GitHub repository, used as the cache key.
/// Case is preserved as given; the platform's own rules decide equivalence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    /// Build an identity, rejecting empty components.
    pub fn new(owner: &str, name: &str) -> Result<Self> {
        if owner.is_empty() || name.is_empty() {
            return Err(DigestError::MissingParameters);
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }

    /// Canonical repository web URL.
    pub fn url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

/// Digest produced by the ingestion bridge. `tree` and `content` are opaque
/// here; only `summary` is ever parsed, for the token estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoDigest {
    pub summary: String,
    pub tree: String,
    pub content: String,
}
