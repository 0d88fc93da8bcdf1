//! The rollback use case.
//!
//! Rollback only repoints `current_version` to an older, still-stored
//! version. It never writes to the artifact store.

use invita_core::error::CoreError;
use invita_core::subdomain::normalize_subdomain;
use invita_core::types::{DbId, Version};
use invita_db::models::published_site::PublishedSite;
use invita_db::repositories::PublishedSiteRepo;

use crate::{PublishError, SitePublisher};

impl SitePublisher {
    /// Move the live pointer of `raw_subdomain` back to `target_version`.
    ///
    /// Rejected with zero side effects when the site is missing, the
    /// caller does not own it, the target equals the current version
    /// (explicit no-op rejection), or the target's artifacts are not in
    /// storage.
    pub async fn rollback(
        &self,
        raw_subdomain: &str,
        target_version: Version,
        owner_user_id: DbId,
    ) -> Result<PublishedSite, PublishError> {
        let subdomain = normalize_subdomain(raw_subdomain)?;

        let site = PublishedSiteRepo::find_by_subdomain(self.pool(), &subdomain)
            .await?
            .ok_or_else(|| CoreError::not_found("PublishedSite", subdomain.clone()))?;

        if site.owner_user_id != owner_user_id {
            return Err(CoreError::Forbidden("You do not own this site".into()).into());
        }

        if target_version == site.current_version {
            return Err(CoreError::Validation(format!(
                "Version {target_version} is already the current version"
            ))
            .into());
        }

        let stored = self.store().list_versions(&subdomain).await?;
        if !stored.contains(&target_version) {
            return Err(CoreError::Validation(format!(
                "Version {target_version} is not available in storage"
            ))
            .into());
        }

        let updated = PublishedSiteRepo::set_current_version(
            self.pool(),
            site.id,
            site.current_version,
            target_version,
        )
        .await?
        .ok_or_else(|| {
            CoreError::Conflict("Site changed concurrently; retry the rollback".into())
        })?;

        tracing::info!(
            subdomain = %updated.subdomain,
            from_version = site.current_version,
            to_version = target_version,
            "Site rolled back"
        );

        Ok(updated)
    }
}
