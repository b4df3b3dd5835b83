// Cache module for local filesystem persistence of repository digests.
// One JSON file per repository key, expired lazily by TTL.

pub mod paths;
pub mod store;

pub use paths::{default_cache_dir, digest_path};
pub use store::{CacheError, CachedDigest, DEFAULT_TTL, DigestCache};
