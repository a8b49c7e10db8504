use sha2::{Digest, Sha256};

use crate::error::{BotError, Result};

/// Hash a fiscal code into the privacy-preserving form used by the
/// subscriptions feed.
///
/// The API reports subscription deltas as SHA-256 digests of the uppercased
/// fiscal code, rendered as lowercase hex. Hashing is the only way to
/// correlate a local code with a feed entry, so the transform must match the
/// remote one exactly: uppercase first, then digest.
pub fn hash_fiscal_code(fiscal_code: &str) -> Result<String> {
    let canonical = canonicalize(fiscal_code);
    if canonical.is_empty() {
        return Err(BotError::EmptyFiscalCode);
    }

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    Ok(hex::encode(hasher.finalize()))
}

/// Canonical form of a fiscal code: trimmed and uppercased.
///
/// Equality and set membership always operate on this form.
pub fn canonicalize(fiscal_code: &str) -> String {
    fiscal_code.trim().to_uppercase()
}
