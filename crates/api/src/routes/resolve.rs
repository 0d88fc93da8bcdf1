//! Route definition for host-to-site resolution.

use axum::routing::get;
use axum::Router;

use crate::handlers::resolve;
use crate::state::AppState;

/// Mount the resolution route (intended for root-level, NOT under
/// `/api/v1`): the serving edge calls it on every cache miss.
///
/// ```text
/// GET /resolve?host=... -> resolve_host
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/resolve", get(resolve::resolve_host))
}
