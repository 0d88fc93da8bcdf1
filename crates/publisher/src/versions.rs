//! The version-listing use case.

use invita_core::error::CoreError;
use invita_core::subdomain::normalize_subdomain;
use invita_core::types::DbId;
use invita_db::models::published_site::VersionEntry;
use invita_db::repositories::PublishedSiteRepo;

use crate::{PublishError, SitePublisher};

impl SitePublisher {
    /// List stored versions of `raw_subdomain`, newest first, with the
    /// live version flagged.
    pub async fn list_versions(
        &self,
        raw_subdomain: &str,
        owner_user_id: DbId,
    ) -> Result<Vec<VersionEntry>, PublishError> {
        let subdomain = normalize_subdomain(raw_subdomain)?;

        let site = PublishedSiteRepo::find_by_subdomain(self.pool(), &subdomain)
            .await?
            .ok_or_else(|| CoreError::not_found("PublishedSite", subdomain.clone()))?;

        if site.owner_user_id != owner_user_id {
            return Err(CoreError::Forbidden("You do not own this site".into()).into());
        }

        let mut versions = self.store().list_versions(&subdomain).await?;

        // The live version is part of the listing even if storage
        // enumeration raced a concurrent publish.
        if site.current_version > 0 && !versions.contains(&site.current_version) {
            versions.push(site.current_version);
            versions.sort_unstable_by(|a, b| b.cmp(a));
        }

        Ok(versions
            .into_iter()
            .map(|version| VersionEntry {
                version,
                is_current: version == site.current_version,
            })
            .collect())
    }
}
