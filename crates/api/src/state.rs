//! Shared application state.

use std::sync::Arc;

use invita_publisher::SitePublisher;

use crate::config::ServerConfig;

/// Shared state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; every service is explicitly constructed in `main`
/// (or the test harness) and injected here -- there is no process-global
/// state anywhere in the service.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: invita_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// The publishing pipeline (store + generator + cleanup queue inside).
    pub publisher: SitePublisher,
}
