// Token-count size gate.
// Reads the bridge's own token estimate out of the digest summary and blocks
// clearly oversized repositories before they are returned or cached.

use crate::error::{DigestError, Result};

/// Label the bridge prints ahead of its token estimate.
const TOKEN_LABEL: &str = "Estimated tokens: ";

/// Ceiling in thousands of tokens. `K` values above this and every `M` value
/// are rejected; the boundary is strictly greater-than, so 750K passes.
const MAX_KILOTOKENS: f64 = 750.0;

/// The estimate text after the last occurrence of the label, trimmed.
fn token_estimate(summary: &str) -> Option<&str> {
    summary
        .rsplit_once(TOKEN_LABEL)
        .map(|(_, rest)| rest.trim())
}

/// Enforce the size ceiling. The gate is asymmetric on purpose: only
/// estimates the bridge itself scales to `K` or `M` are checked, so small
/// and unlabeled repositories are never blocked.
pub fn enforce_size_gate(summary: &str) -> Result<()> {
    let Some(estimate) = token_estimate(summary) else {
        return Ok(());
    };

    if estimate.ends_with('M') {
        return Err(DigestError::RepoTooLarge);
    }

    if let Some(thousands) = estimate.strip_suffix('K') {
        let value: f64 = thousands.trim().parse().map_err(|_| {
            DigestError::Processing(format!("unparseable token estimate: {estimate}"))
        })?;
        if value > MAX_KILOTOKENS {
            return Err(DigestError::RepoTooLarge);
        }
    }

    Ok(())
}
