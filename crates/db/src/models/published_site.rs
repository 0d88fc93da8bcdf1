//! Published site models and DTOs.

use invita_core::types::{DbId, Timestamp, Version};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `published_sites` table: the durable publish pointer.
///
/// Invariant: whenever `published` is true, the artifact store holds a
/// complete snapshot under `sites/<subdomain>/v<current_version>/`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PublishedSite {
    pub id: DbId,
    pub invitation_id: DbId,
    pub owner_user_id: DbId,
    pub subdomain: String,
    /// True only after the first successful publish.
    pub published: bool,
    /// 0 while unpublished; +1 per successful publish; moved backwards
    /// only by explicit rollback.
    pub current_version: Version,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub published_at: Option<Timestamp>,
}

/// DTO for lazily creating the site row on a first publish attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePublishedSite {
    pub invitation_id: DbId,
    pub owner_user_id: DbId,
    pub subdomain: String,
}

/// One entry of the merged version listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionEntry {
    pub version: Version,
    pub is_current: bool,
}
