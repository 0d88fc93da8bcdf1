//! Subdomain normalization and validation.
//!
//! Subdomains form a shared global namespace of DNS labels, one per
//! published site. Normalization is lenient about the things users
//! habitually type (case, whitespace, spaces, underscores); everything
//! else is rejected rather than rewritten.

use crate::error::CoreError;

/// Minimum subdomain length after normalization.
const MIN_LEN: usize = 3;

/// Maximum subdomain length after normalization (DNS label limit).
const MAX_LEN: usize = 63;

/// Names that can never be claimed as a site subdomain, even when they are
/// syntactically valid labels. Checked after normalization so casing or
/// surrounding whitespace cannot bypass the list.
const RESERVED: &[&str] = &["www", "api", "admin", "support", "mail", "assets"];

/// Normalize a user-supplied subdomain and validate the result.
///
/// Lower-cases, trims surrounding whitespace, and maps spaces and
/// underscores to hyphens, then enforces DNS-label shape:
///
/// - length between 3 and 63,
/// - characters limited to `[a-z0-9-]`,
/// - no leading/trailing hyphen, no `--`,
/// - not one of the reserved names.
///
/// The function is idempotent: feeding its output back in returns the
/// same value.
///
/// # Examples
///
/// ```
/// use invita_core::subdomain::normalize_subdomain;
///
/// assert_eq!(normalize_subdomain("  My Wedding ").unwrap(), "my-wedding");
/// assert_eq!(normalize_subdomain("anna_und_max").unwrap(), "anna-und-max");
/// assert!(normalize_subdomain("www").is_err());
/// ```
pub fn normalize_subdomain(raw: &str) -> Result<String, CoreError> {
    let normalized: String = raw
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '_' { '-' } else { c })
        .collect();

    if normalized.len() < MIN_LEN {
        return Err(CoreError::Validation(format!(
            "Subdomain must be at least {MIN_LEN} characters"
        )));
    }
    if normalized.len() > MAX_LEN {
        return Err(CoreError::Validation(format!(
            "Subdomain must be at most {MAX_LEN} characters"
        )));
    }
    if normalized.starts_with('-') || normalized.ends_with('-') {
        return Err(CoreError::Validation(
            "Subdomain must not start or end with a hyphen".into(),
        ));
    }
    if normalized.contains("--") {
        return Err(CoreError::Validation(
            "Subdomain must not contain consecutive hyphens".into(),
        ));
    }
    if let Some(bad) = normalized
        .chars()
        .find(|c| !c.is_ascii_lowercase() && !c.is_ascii_digit() && *c != '-')
    {
        return Err(CoreError::Validation(format!(
            "Subdomain contains invalid character '{bad}'. Allowed: a-z, 0-9, '-'"
        )));
    }
    if RESERVED.contains(&normalized.as_str()) {
        return Err(CoreError::Validation(format!(
            "Subdomain '{normalized}' is reserved"
        )));
    }

    Ok(normalized)
}
