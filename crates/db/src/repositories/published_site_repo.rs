//! Repository for the `published_sites` table.
//!
//! Pointer mutations are compare-and-swap updates keyed on the version the
//! caller last observed, so two concurrent publishes of the same site can
//! never both advance the pointer from the same base version.

use invita_core::types::{DbId, Version};
use sqlx::PgPool;

use crate::models::published_site::{CreatePublishedSite, PublishedSite};

/// Column list for `published_sites` queries.
const SITE_COLUMNS: &str = "\
    id, invitation_id, owner_user_id, subdomain, \
    published, current_version, \
    created_at, updated_at, published_at";

/// Provides lookups and pointer updates for published sites.
pub struct PublishedSiteRepo;

impl PublishedSiteRepo {
    /// Create the site row for an invitation, unpublished at version 0.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePublishedSite,
    ) -> Result<PublishedSite, sqlx::Error> {
        let query = format!(
            "INSERT INTO published_sites (invitation_id, owner_user_id, subdomain) \
             VALUES ($1, $2, $3) \
             RETURNING {SITE_COLUMNS}"
        );
        sqlx::query_as::<_, PublishedSite>(&query)
            .bind(input.invitation_id)
            .bind(input.owner_user_id)
            .bind(&input.subdomain)
            .fetch_one(pool)
            .await
    }

    /// Find a site by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PublishedSite>, sqlx::Error> {
        let query = format!("SELECT {SITE_COLUMNS} FROM published_sites WHERE id = $1");
        sqlx::query_as::<_, PublishedSite>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a site by its subdomain (the semantic unique key).
    pub async fn find_by_subdomain(
        pool: &PgPool,
        subdomain: &str,
    ) -> Result<Option<PublishedSite>, sqlx::Error> {
        let query = format!("SELECT {SITE_COLUMNS} FROM published_sites WHERE subdomain = $1");
        sqlx::query_as::<_, PublishedSite>(&query)
            .bind(subdomain)
            .fetch_optional(pool)
            .await
    }

    /// Find the site belonging to an invitation (at most one exists).
    pub async fn find_by_invitation(
        pool: &PgPool,
        invitation_id: DbId,
    ) -> Result<Option<PublishedSite>, sqlx::Error> {
        let query = format!("SELECT {SITE_COLUMNS} FROM published_sites WHERE invitation_id = $1");
        sqlx::query_as::<_, PublishedSite>(&query)
            .bind(invitation_id)
            .fetch_optional(pool)
            .await
    }

    /// Re-bind a site to a new subdomain (before a publish that targets a
    /// different name). The unique constraint guards against collisions.
    pub async fn update_subdomain(
        pool: &PgPool,
        id: DbId,
        subdomain: &str,
    ) -> Result<Option<PublishedSite>, sqlx::Error> {
        let query = format!(
            "UPDATE published_sites \
             SET subdomain = $2, updated_at = now() \
             WHERE id = $1 \
             RETURNING {SITE_COLUMNS}"
        );
        sqlx::query_as::<_, PublishedSite>(&query)
            .bind(id)
            .bind(subdomain)
            .fetch_optional(pool)
            .await
    }

    /// Advance the live pointer after a successful publish.
    ///
    /// Compare-and-swap: the update only applies when `current_version`
    /// still equals `expected_version`. Returns `None` on a CAS miss
    /// (a concurrent publish won the race) or when the row is gone.
    pub async fn advance_version(
        pool: &PgPool,
        id: DbId,
        expected_version: Version,
        new_version: Version,
    ) -> Result<Option<PublishedSite>, sqlx::Error> {
        let query = format!(
            "UPDATE published_sites \
             SET published = TRUE, current_version = $3, \
                 published_at = now(), updated_at = now() \
             WHERE id = $1 AND current_version = $2 \
             RETURNING {SITE_COLUMNS}"
        );
        sqlx::query_as::<_, PublishedSite>(&query)
            .bind(id)
            .bind(expected_version)
            .bind(new_version)
            .fetch_optional(pool)
            .await
    }

    /// Move the live pointer to a previously published version (rollback).
    ///
    /// Same CAS shape as [`Self::advance_version`], but `published` and
    /// `published_at` are untouched: rollback repoints, it does not publish.
    pub async fn set_current_version(
        pool: &PgPool,
        id: DbId,
        expected_version: Version,
        target_version: Version,
    ) -> Result<Option<PublishedSite>, sqlx::Error> {
        let query = format!(
            "UPDATE published_sites \
             SET current_version = $3, updated_at = now() \
             WHERE id = $1 AND current_version = $2 \
             RETURNING {SITE_COLUMNS}"
        );
        sqlx::query_as::<_, PublishedSite>(&query)
            .bind(id)
            .bind(expected_version)
            .bind(target_version)
            .fetch_optional(pool)
            .await
    }
}
