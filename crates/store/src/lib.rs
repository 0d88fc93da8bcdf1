//! Durable, versioned artifact storage.
//!
//! The [`ArtifactStore`] trait is the only storage surface the publishing
//! pipeline sees. Three backends implement it with bit-identical key
//! validation and namespace conventions:
//!
//! - [`LocalStore`] — filesystem, for development,
//! - [`S3Store`] — S3-compatible object storage, for production,
//! - [`MemoryStore`] — in-process map, for tests.

use invita_core::error::CoreError;
use invita_core::types::Version;

mod local;
mod memory;
mod s3;

pub use local::LocalStore;
pub use memory::MemoryStore;
pub use s3::S3Store;

/// Errors from artifact storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The key failed validation; nothing was written.
    #[error(transparent)]
    InvalidKey(#[from] CoreError),

    /// Filesystem-level failure (local backend).
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Object-store failure (S3 backend).
    #[error("S3 error: {0}")]
    S3(String),
}

/// Durable blob storage keyed by `sites/<subdomain>/v<version>/<path>`.
///
/// Writes are whole-object; overwriting an existing key is permitted (used
/// for idempotent retries) but callers never intentionally write into a
/// different version's prefix.
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Store one object. The key is validated before any I/O.
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        cache_control: &str,
        body: Vec<u8>,
    ) -> Result<(), StoreError>;

    /// A stable, externally dereferenceable URL for `key`, or the empty
    /// string when URL construction is deferred to an edge layer.
    fn public_url(&self, key: &str) -> String;

    /// Known version numbers for a subdomain, sorted descending.
    async fn list_versions(&self, subdomain: &str) -> Result<Vec<Version>, StoreError>;

    /// Remove every object under one version's prefix. Only retention
    /// cleanup calls this; the live pointer never depends on it.
    async fn delete_version(&self, subdomain: &str, version: Version) -> Result<(), StoreError>;
}

/// Parse a `v<N>` path segment into a version number.
///
/// Shared by the backends so directory names and S3 common prefixes are
/// interpreted identically.
pub(crate) fn parse_version_segment(segment: &str) -> Option<Version> {
    let digits = segment.strip_prefix('v')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
