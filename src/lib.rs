// gitdigest library crate.
// Cache-and-gate layer around an external repository-ingestion bridge, plus
// the HTTP surface that exposes it.

pub mod cache;
pub mod config;
pub mod error;
pub mod github;
pub mod ingest;
pub mod server;
pub mod service;
pub mod types;
