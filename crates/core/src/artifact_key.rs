//! Artifact key validation and key-namespace helpers.
//!
//! Every stored object lives under `sites/<subdomain>/v<version>/<rest>`.
//! Keys are validated, never rewritten: a key that differs from its own
//! lexically normalized form is rejected outright so traversal tricks
//! (`..`, doubled slashes, `.` segments) can never escape the version
//! prefix, regardless of which storage backend performs the write.

use crate::error::CoreError;
use crate::types::Version;

/// Validate that `key` is a canonical, namespace-safe storage key.
///
/// Rejected:
/// - the empty string,
/// - any absolute key (leading `/`),
/// - any key whose normalized form is `.`, `..`, or escapes upward,
/// - any key that is not already in normalized form (callers must submit
///   canonical keys; this function does not fix them up).
pub fn validate_artifact_key(key: &str) -> Result<(), CoreError> {
    if key.is_empty() {
        return Err(CoreError::Validation("Artifact key must not be empty".into()));
    }
    if key.starts_with('/') {
        return Err(CoreError::Validation(format!(
            "Artifact key '{key}' must be relative (no leading '/')"
        )));
    }

    let normalized = normalize_key(key);

    if normalized.is_empty() || normalized == ".." || normalized.starts_with("../") {
        return Err(CoreError::Validation(format!(
            "Artifact key '{key}' escapes the storage namespace"
        )));
    }
    if normalized != key {
        return Err(CoreError::Validation(format!(
            "Artifact key '{key}' is not in canonical form (expected '{normalized}')"
        )));
    }

    Ok(())
}

/// Lexically normalize a slash-separated key: drop empty and `.` segments,
/// resolve `..` against preceding segments (keeping unmatched `..` at the
/// front so escapes stay visible to the caller).
fn normalize_key(key: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    for segment in key.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if matches!(out.last(), Some(&"..") | None) {
                    out.push("..");
                } else {
                    out.pop();
                }
            }
            s => out.push(s),
        }
    }
    out.join("/")
}

/// The storage prefix for one version of one site: `sites/<sub>/v<n>`.
pub fn version_prefix(subdomain: &str, version: Version) -> String {
    format!("sites/{subdomain}/v{version}")
}

/// Build the canonical key for one artifact of one site version.
pub fn artifact_key(subdomain: &str, version: Version, rest: &str) -> String {
    format!("{}/{rest}", version_prefix(subdomain, version))
}
