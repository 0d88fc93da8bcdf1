//! The publish use case.
//!
//! Every step is a hard gate: failure aborts with no further mutation.
//! The version number of a failed attempt is simply not reused -- the next
//! attempt recomputes `current_version + 1` from the unchanged pointer, so
//! abandoned partial uploads stay orphaned and unreferenced.

use invita_core::artifact_key::artifact_key;
use invita_core::bundle::SnapshotBundle;
use invita_core::error::CoreError;
use invita_core::subdomain::normalize_subdomain;
use invita_core::types::{DbId, Version};
use invita_db::models::published_site::{CreatePublishedSite, PublishedSite};
use invita_db::repositories::{InvitationRepo, PublishedSiteRepo};
use serde::Serialize;

use crate::{
    PublishError, SitePublisher, APP_JS_PLACEHOLDER, CACHE_IMMUTABLE, CACHE_REVALIDATE,
};

/// What a successful publish returns to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct PublishOutcome {
    /// The normalized subdomain the site is live under.
    pub subdomain: String,
    /// The freshly published version.
    pub version: Version,
    /// Public URL of the index artifact (empty when the store defers URL
    /// construction to an edge layer).
    pub url: String,
}

impl SitePublisher {
    /// Publish `invitation_id` to `raw_subdomain` on behalf of
    /// `owner_user_id`.
    ///
    /// Ordering: subdomain validation, ownership checks, and site
    /// lookup/create all precede generation; generation precedes every
    /// storage write; the `index.html` write precedes all other writes;
    /// the pointer update comes last and is the single moment the new
    /// version becomes externally visible.
    pub async fn publish(
        &self,
        invitation_id: DbId,
        owner_user_id: DbId,
        raw_subdomain: &str,
    ) -> Result<PublishOutcome, PublishError> {
        // 1. Normalize and validate the subdomain (reserved names included).
        let subdomain = normalize_subdomain(raw_subdomain)?;

        // 2. The invitation must exist and belong to the caller.
        let invitation = InvitationRepo::find_by_id(self.pool(), invitation_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Invitation", invitation_id.to_string()))?;
        if invitation.user_id != owner_user_id {
            return Err(CoreError::Forbidden(
                "You do not own this invitation".into(),
            )
            .into());
        }

        // 3. Subdomains are a shared global namespace: a site already
        //    claiming this name blocks the publish unless it is this very
        //    invitation's site.
        if let Some(existing) = PublishedSiteRepo::find_by_subdomain(self.pool(), &subdomain).await?
        {
            if existing.owner_user_id != owner_user_id {
                return Err(CoreError::Conflict(format!(
                    "Subdomain '{subdomain}' is already taken"
                ))
                .into());
            }
            if existing.invitation_id != invitation_id {
                return Err(CoreError::Conflict(format!(
                    "Subdomain '{subdomain}' is already used by another of your sites"
                ))
                .into());
            }
        }

        // 4. Look up (or lazily create) the site for this invitation,
        //    re-binding its subdomain when the target name changed.
        let site = self
            .site_for_invitation(invitation_id, owner_user_id, &subdomain)
            .await?;

        // 5. The version this attempt will produce.
        let new_version = site.current_version + 1;

        // 6. Generate the bundle. Failure aborts before any storage write.
        let bundle = self
            .generator()
            .generate_bundle(&invitation.layout_id, &invitation.data)
            .await?;

        tracing::debug!(
            subdomain = %subdomain,
            version = new_version,
            artifacts = bundle.artifact_count(),
            "Snapshot generated"
        );

        // 7+8. Write artifacts, index first.
        let index_key = self
            .write_artifacts(&subdomain, new_version, bundle)
            .await?;

        // 9. Atomically advance the pointer. A CAS miss means a concurrent
        //    publish advanced it first; this attempt's objects stay orphaned.
        let updated = PublishedSiteRepo::advance_version(
            self.pool(),
            site.id,
            site.current_version,
            new_version,
        )
        .await?
        .ok_or_else(|| {
            CoreError::Conflict(
                "Site was published concurrently; retry to publish on top of it".into(),
            )
        })?;

        tracing::info!(
            subdomain = %updated.subdomain,
            version = updated.current_version,
            invitation_id,
            "Site published"
        );

        // 10. Best-effort retention cleanup; never affects the result.
        self.cleanup().request(subdomain.clone());

        Ok(PublishOutcome {
            url: self.store().public_url(&index_key),
            subdomain,
            version: new_version,
        })
    }

    /// Fetch the invitation's site row, creating it (unpublished, version
    /// 0) on the first publish attempt and re-binding its subdomain if the
    /// caller chose a new, free name.
    async fn site_for_invitation(
        &self,
        invitation_id: DbId,
        owner_user_id: DbId,
        subdomain: &str,
    ) -> Result<PublishedSite, PublishError> {
        match PublishedSiteRepo::find_by_invitation(self.pool(), invitation_id).await? {
            Some(site) if site.subdomain == subdomain => Ok(site),
            Some(site) => {
                let rebound =
                    PublishedSiteRepo::update_subdomain(self.pool(), site.id, subdomain)
                        .await?
                        .ok_or_else(|| {
                            CoreError::not_found("PublishedSite", site.id.to_string())
                        })?;
                tracing::info!(
                    site_id = rebound.id,
                    from = %site.subdomain,
                    to = %subdomain,
                    "Site re-bound to new subdomain"
                );
                Ok(rebound)
            }
            None => {
                let created = PublishedSiteRepo::create(
                    self.pool(),
                    &CreatePublishedSite {
                        invitation_id,
                        owner_user_id,
                        subdomain: subdomain.to_string(),
                    },
                )
                .await?;
                Ok(created)
            }
        }
    }

    /// Write every artifact of the bundle under the version prefix.
    ///
    /// `index.html` goes first -- it is the object the resolution path
    /// depends on. Returns the index key for URL construction.
    async fn write_artifacts(
        &self,
        subdomain: &str,
        version: Version,
        bundle: SnapshotBundle,
    ) -> Result<String, PublishError> {
        let index_key = artifact_key(subdomain, version, "index.html");
        self.store()
            .put(
                &index_key,
                "text/html; charset=utf-8",
                CACHE_REVALIDATE,
                bundle.index_html.into_bytes(),
            )
            .await?;

        let manifest_key = artifact_key(subdomain, version, "manifest.json");
        let manifest_body = serde_json::to_vec(&bundle.manifest)
            .map_err(|e| CoreError::Internal(format!("manifest encode failed: {e}")))?;
        self.store()
            .put(&manifest_key, "application/json", CACHE_REVALIDATE, manifest_body)
            .await?;

        if let Some(css) = bundle.styles_css {
            let css_key = artifact_key(subdomain, version, "styles.css");
            self.store()
                .put(&css_key, "text/css", CACHE_IMMUTABLE, css.into_bytes())
                .await?;
        }

        let app_js_key = artifact_key(subdomain, version, "app.js");
        self.store()
            .put(
                &app_js_key,
                "application/javascript",
                CACHE_IMMUTABLE,
                APP_JS_PLACEHOLDER.as_bytes().to_vec(),
            )
            .await?;

        for asset in bundle.assets {
            let key = artifact_key(subdomain, version, &asset.key_suffix);
            self.store()
                .put(&key, &asset.content_type, CACHE_IMMUTABLE, asset.body)
                .await?;
        }

        Ok(index_key)
    }
}
