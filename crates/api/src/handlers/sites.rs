//! Handlers for the `/sites` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use invita_core::error::CoreError;
use invita_core::subdomain::normalize_subdomain;
use invita_core::types::{DbId, Version};
use invita_db::models::published_site::{PublishedSite, VersionEntry};
use invita_db::repositories::PublishedSiteRepo;
use invita_publisher::PublishOutcome;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /api/v1/sites/publish`.
#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub invitation_id: DbId,
    pub user_id: DbId,
    pub subdomain: String,
}

/// Body of `POST /api/v1/sites/{subdomain}/rollback`.
#[derive(Debug, Deserialize)]
pub struct RollbackRequest {
    pub user_id: DbId,
    pub target_version: Version,
}

/// Query string carrying the acting user on owner-scoped reads.
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub user_id: DbId,
}

/// POST /api/v1/sites/publish
pub async fn publish(
    State(state): State<AppState>,
    Json(input): Json<PublishRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<PublishOutcome>>)> {
    let outcome = state
        .publisher
        .publish(input.invitation_id, input.user_id, &input.subdomain)
        .await?;

    tracing::info!(
        subdomain = %outcome.subdomain,
        version = outcome.version,
        "Site published"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: outcome })))
}

/// GET /api/v1/sites/{subdomain}
pub async fn get_site(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<Json<DataResponse<PublishedSite>>> {
    let subdomain = normalize_subdomain(&subdomain)?;

    let site = PublishedSiteRepo::find_by_subdomain(&state.pool, &subdomain)
        .await?
        .ok_or_else(|| CoreError::not_found("PublishedSite", subdomain.clone()))?;

    if site.owner_user_id != query.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this site".into(),
        )));
    }

    Ok(Json(DataResponse { data: site }))
}

/// GET /api/v1/sites/{subdomain}/versions
pub async fn list_versions(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> AppResult<Json<DataResponse<Vec<VersionEntry>>>> {
    let versions = state
        .publisher
        .list_versions(&subdomain, query.user_id)
        .await?;

    Ok(Json(DataResponse { data: versions }))
}

/// POST /api/v1/sites/{subdomain}/rollback
pub async fn rollback(
    State(state): State<AppState>,
    Path(subdomain): Path<String>,
    Json(input): Json<RollbackRequest>,
) -> AppResult<Json<DataResponse<PublishedSite>>> {
    let site = state
        .publisher
        .rollback(&subdomain, input.target_version, input.user_id)
        .await?;

    tracing::info!(
        subdomain = %site.subdomain,
        version = site.current_version,
        "Site rolled back"
    );

    Ok(Json(DataResponse { data: site }))
}
