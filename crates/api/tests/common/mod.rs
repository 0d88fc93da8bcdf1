#![allow(dead_code)]

//! Shared harness for API integration tests.
//!
//! Builds the application through [`build_app_router`] so tests exercise
//! the exact middleware stack (CORS, request ID, timeout, tracing, panic
//! recovery) that production uses, with the in-memory artifact store and
//! a stub snapshot generator standing in for the real backends.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use invita_api::config::{RendererConfig, RetentionConfig, ServerConfig, StoreConfig};
use invita_api::router::build_app_router;
use invita_api::state::AppState;
use invita_core::bundle::{SnapshotAsset, SnapshotBundle};
use invita_db::models::invitation::CreateInvitation;
use invita_db::repositories::{InvitationRepo, UserRepo};
use invita_publisher::{cleanup_channel, CleanupRequest, SitePublisher};
use invita_renderer::{RenderError, SnapshotGenerator};
use invita_store::MemoryStore;

/// Generator returning a fixed bundle with one asset.
pub struct StubRenderer;

#[async_trait::async_trait]
impl SnapshotGenerator for StubRenderer {
    async fn generate_bundle(
        &self,
        layout_id: &str,
        _data: &serde_json::Value,
    ) -> Result<SnapshotBundle, RenderError> {
        Ok(SnapshotBundle {
            index_html: format!("<html>{layout_id}</html>"),
            styles_css: Some("body{}".to_string()),
            manifest: serde_json::json!({ "layout": layout_id }),
            assets: vec![SnapshotAsset {
                key_suffix: "assets/photo.jpg".to_string(),
                content_type: "image/jpeg".to_string(),
                body: vec![0xFF, 0xD8],
            }],
        })
    }
}

/// Generator that always fails.
pub struct BrokenRenderer;

#[async_trait::async_trait]
impl SnapshotGenerator for BrokenRenderer {
    async fn generate_bundle(
        &self,
        _layout_id: &str,
        _data: &serde_json::Value,
    ) -> Result<SnapshotBundle, RenderError> {
        Err(RenderError::Failed {
            exit_code: 1,
            stderr: "boom".to_string(),
        })
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        base_domain: "invita.site".to_string(),
        store: StoreConfig::Local {
            root: "./data/sites".to_string(),
            public_base: "http://localhost:3000/sites".to_string(),
        },
        renderer: RendererConfig {
            program: "true".to_string(),
            args: vec![],
            timeout: Duration::from_secs(5),
        },
        retention: RetentionConfig {
            keep_versions: 5,
            queue_depth: 8,
        },
    }
}

/// The application under test plus handles into its fakes.
pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    /// Kept alive so enqueued cleanup requests do not log send failures;
    /// no retention worker runs in tests.
    _cleanup_rx: tokio::sync::mpsc::Receiver<CleanupRequest>,
}

/// Build the full application with the stub renderer.
pub fn build_test_app(pool: PgPool) -> TestApp {
    build_test_app_with(pool, Arc::new(StubRenderer))
}

/// Build the full application with a caller-supplied generator.
pub fn build_test_app_with(pool: PgPool, generator: Arc<dyn SnapshotGenerator>) -> TestApp {
    let config = test_config();
    let store = Arc::new(MemoryStore::new());
    let (queue, rx) = cleanup_channel(config.retention.queue_depth);
    let publisher = SitePublisher::new(pool.clone(), store.clone(), generator, queue);

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        publisher,
    };

    TestApp {
        router: build_app_router(state, &config),
        store,
        _cleanup_rx: rx,
    }
}

/// Seed a user and one of their invitations; returns `(user_id, invitation_id)`.
pub async fn seed_invitation(pool: &PgPool, email: &str) -> (i64, i64) {
    let user = UserRepo::create(pool, email).await.unwrap();
    let invitation = InvitationRepo::create(
        pool,
        &CreateInvitation {
            user_id: user.id,
            layout_id: "classic".to_string(),
            data: Some(serde_json::json!({ "title": "We're getting married" })),
        },
    )
    .await
    .unwrap();
    (user.id, invitation.id)
}

/// Send a GET request to the router and return the raw response.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a JSON POST request to the router and return the raw response.
pub async fn post(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the response carries `status` and an error body with `code`.
pub async fn assert_error(response: Response, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code, "unexpected error body: {json}");
}
