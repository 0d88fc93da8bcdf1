pub mod health;
pub mod resolve;
pub mod sites;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /sites/publish                    publish an invitation (POST)
/// /sites/{subdomain}                site details for its owner
/// /sites/{subdomain}/versions       stored versions, newest first
/// /sites/{subdomain}/rollback       repoint to an older version (POST)
/// ```
///
/// `/health` and `/resolve` live at the root level, not under `/api/v1`;
/// see [`health::router`] and [`resolve::router`].
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/sites", sites::router())
}
