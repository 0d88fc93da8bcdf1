//! Host-to-site resolution for the serving edge.

use invita_core::artifact_key::artifact_key;
use invita_core::types::Version;
use invita_db::repositories::PublishedSiteRepo;
use serde::Serialize;

use crate::{PublishError, SitePublisher};

/// What the edge needs to serve a live site.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedSite {
    pub subdomain: String,
    /// Always true in a successful resolution; sites that never completed
    /// a publish resolve to `None` instead.
    pub published: bool,
    /// The version the live pointer currently designates.
    pub current_version: Version,
    /// Public URL of the live `index.html` (empty when the store defers
    /// URL construction to an edge layer).
    pub url: String,
}

impl SitePublisher {
    /// Resolve a normalized subdomain to its live snapshot.
    ///
    /// Returns `None` for unknown subdomains and for sites that have never
    /// completed a publish. Resolution is read-only and unauthenticated:
    /// it exposes exactly what serving the site would expose.
    pub async fn resolve(&self, subdomain: &str) -> Result<Option<ResolvedSite>, PublishError> {
        let Some(site) = PublishedSiteRepo::find_by_subdomain(self.pool(), subdomain).await? else {
            return Ok(None);
        };

        if !site.published || site.current_version <= 0 {
            return Ok(None);
        }

        let index_key = artifact_key(&site.subdomain, site.current_version, "index.html");

        Ok(Some(ResolvedSite {
            url: self.store().public_url(&index_key),
            published: site.published,
            current_version: site.current_version,
            subdomain: site.subdomain,
        }))
    }
}
