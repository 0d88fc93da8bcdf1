//! Route definitions for the published-site resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sites;
use crate::state::AppState;

/// Site routes mounted at `/sites`.
///
/// ```text
/// POST   /publish                 -> publish
/// GET    /{subdomain}             -> get_site
/// GET    /{subdomain}/versions    -> list_versions
/// POST   /{subdomain}/rollback    -> rollback
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/publish", post(sites::publish))
        .route("/{subdomain}", get(sites::get_site))
        .route("/{subdomain}/versions", get(sites::list_versions))
        .route("/{subdomain}/rollback", post(sites::rollback))
}
