use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invita_api::config::{ServerConfig, StoreConfig};
use invita_api::router::build_app_router;
use invita_api::state::AppState;
use invita_publisher::{cleanup_channel, RetentionWorker, SitePublisher};
use invita_renderer::SubprocessRenderer;
use invita_store::{ArtifactStore, LocalStore, S3Store};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "invita_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = invita_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    invita_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    invita_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Artifact store ---
    let store: Arc<dyn ArtifactStore> = match &config.store {
        StoreConfig::Local { root, public_base } => {
            tracing::info!(root = %root, "Using local artifact store");
            Arc::new(LocalStore::new(root, public_base))
        }
        StoreConfig::S3 {
            bucket,
            public_base,
        } => {
            tracing::info!(bucket = %bucket, "Using S3 artifact store");
            Arc::new(S3Store::from_env(bucket, public_base.clone()).await)
        }
    };

    // --- Snapshot renderer ---
    let generator = Arc::new(SubprocessRenderer::new(
        config.renderer.program.clone(),
        config.renderer.args.clone(),
        config.renderer.timeout,
    ));

    // --- Retention worker ---
    let (cleanup_queue, cleanup_rx) = cleanup_channel(config.retention.queue_depth);
    let retention_cancel = tokio_util::sync::CancellationToken::new();
    let retention_worker = RetentionWorker::new(Arc::clone(&store), config.retention.keep_versions);
    let retention_handle = {
        let cancel = retention_cancel.clone();
        tokio::spawn(async move {
            retention_worker.run(cleanup_rx, cancel).await;
        })
    };
    tracing::info!(
        keep_versions = config.retention.keep_versions,
        "Retention worker started"
    );

    // --- Publisher ---
    let publisher = SitePublisher::new(pool.clone(), store, generator, cleanup_queue);

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        publisher,
    };

    // --- Router ---
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    retention_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), retention_handle).await;
    tracing::info!("Retention worker stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
