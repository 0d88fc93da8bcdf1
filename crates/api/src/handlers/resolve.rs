//! Handler for host-to-site resolution.
//!
//! The serving edge calls `GET /resolve?host=...` on every cache miss to
//! learn which snapshot is live for a host. Responses carry a short
//! public cache lifetime so the edge can absorb request bursts without a
//! database round trip per hit, while rollbacks still propagate within
//! seconds.

use axum::extract::{Query, State};
use axum::http::header;
use axum::Json;
use invita_core::error::CoreError;
use invita_publisher::ResolvedSite;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// How long the edge may cache a resolution.
const RESOLVE_CACHE_CONTROL: &str = "public, max-age=30";

/// Query string of `GET /resolve`.
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    /// The host header the edge received, e.g. `anna-beno.invita.site`.
    pub host: String,
}

/// GET /resolve?host=...
pub async fn resolve_host(
    State(state): State<AppState>,
    Query(query): Query<ResolveQuery>,
) -> AppResult<([(header::HeaderName, &'static str); 1], Json<DataResponse<ResolvedSite>>)> {
    let subdomain = subdomain_from_host(&query.host, &state.config.base_domain)?;

    let resolved = state
        .publisher
        .resolve(&subdomain)
        .await?
        .ok_or_else(|| CoreError::not_found("Site", subdomain))?;

    Ok((
        [(header::CACHE_CONTROL, RESOLVE_CACHE_CONTROL)],
        Json(DataResponse { data: resolved }),
    ))
}

/// Extract the subdomain label from a host header.
///
/// Accepts `label.<base_domain>` (with an optional port) and a bare
/// label. The label must be a single DNS label: a host with extra dots
/// under the base domain, or under a foreign domain, is rejected rather
/// than guessed at.
fn subdomain_from_host(host: &str, base_domain: &str) -> Result<String, AppError> {
    let host = host.trim().trim_end_matches('.').to_ascii_lowercase();
    let host = host.split(':').next().unwrap_or_default();

    if host.is_empty() {
        return Err(AppError::BadRequest("host must not be empty".into()));
    }

    if host == base_domain {
        return Err(AppError::BadRequest(format!(
            "host '{host}' has no subdomain label"
        )));
    }

    let label = match host.strip_suffix(base_domain) {
        Some(prefix) => prefix.strip_suffix('.').ok_or_else(|| {
            AppError::BadRequest(format!("host '{host}' is not under {base_domain}"))
        })?,
        None => &host,
    };

    if label.is_empty() || label.contains('.') {
        return Err(AppError::BadRequest(format!(
            "host '{host}' does not contain a single subdomain label"
        )));
    }

    Ok(label.to_string())
}
