// Error types for the gitdigest service.
// The closed vocabulary surfaced to HTTP and CLI callers; upstream failure
// text only ever rides along as diagnostic detail, never as identity.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    #[error("repository not found or unreachable")]
    RepoNotFound,

    #[error("private repository or rate limit exceeded")]
    RepoPrivateOrRateLimited,

    #[error("repository is too large to process")]
    RepoTooLarge,

    #[error("missing required parameters: owner and repo")]
    MissingParameters,

    #[error("processing error: {0}")]
    Processing(String),
}

impl DigestError {
    /// Stable wire code consumed by API and CLI clients.
    pub fn code(&self) -> String {
        match self {
            Self::RepoNotFound => "error:repo_not_found".to_string(),
            Self::RepoPrivateOrRateLimited => "error:repo_private".to_string(),
            Self::RepoTooLarge => "error:repo_too_large".to_string(),
            Self::MissingParameters => "error:missing_parameters".to_string(),
            Self::Processing(detail) => format!("processing_error: {detail}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, DigestError>;
