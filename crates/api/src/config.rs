//! Server and service configuration loaded from environment variables.

use std::time::Duration;

use invita_core::error::CoreError;

/// Server configuration.
///
/// All fields have defaults suitable for local development; override via
/// environment variables in production.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Base domain published sites live under; used by the resolution
    /// endpoint to derive subdomains from host headers.
    pub base_domain: String,
    /// Artifact storage backend selection.
    pub store: StoreConfig,
    /// External renderer invocation.
    pub renderer: RendererConfig,
    /// Retention cleanup tuning.
    pub retention: RetentionConfig,
}

/// Which artifact store backend to construct, with its settings.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    /// Filesystem store for development.
    Local {
        root: String,
        public_base: String,
    },
    /// S3-compatible object storage for production. `public_base = None`
    /// defers URL construction to the edge layer.
    S3 {
        bucket: String,
        public_base: Option<String>,
    },
}

/// External renderer process settings.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

/// Retention cleanup settings.
#[derive(Debug, Clone)]
pub struct RetentionConfig {
    /// Number of most-recent versions kept per site.
    pub keep_versions: usize,
    /// Bound of the cleanup request queue.
    pub queue_depth: usize,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                            |
    /// |---------------------------|------------------------------------|
    /// | `HOST`                    | `0.0.0.0`                          |
    /// | `PORT`                    | `3000`                             |
    /// | `CORS_ORIGINS`            | `http://localhost:5173`            |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                               |
    /// | `SITE_BASE_DOMAIN`        | `invita.site`                      |
    /// | `ARTIFACT_STORE`          | `local`                            |
    /// | `ARTIFACT_ROOT`           | `./data/sites`                     |
    /// | `PUBLIC_BASE_URL`         | `http://localhost:3000/sites`      |
    /// | `S3_BUCKET`               | -- (required when `ARTIFACT_STORE=s3`) |
    /// | `RENDERER_CMD`            | `node`                             |
    /// | `RENDERER_ARGS`           | `renderer/render.js`               |
    /// | `RENDERER_TIMEOUT_SECS`   | `30`                               |
    /// | `RETENTION_KEEP_VERSIONS` | `5`                                |
    /// | `RETENTION_QUEUE_DEPTH`   | `64`                               |
    pub fn from_env() -> Result<Self, CoreError> {
        let host = env_or("HOST", "0.0.0.0");
        let port: u16 = parse_env("PORT", "3000")?;

        let cors_origins: Vec<String> = env_or("CORS_ORIGINS", "http://localhost:5173")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = parse_env("REQUEST_TIMEOUT_SECS", "30")?;
        let base_domain = env_or("SITE_BASE_DOMAIN", "invita.site");

        let store = match env_or("ARTIFACT_STORE", "local").as_str() {
            "local" => StoreConfig::Local {
                root: env_or("ARTIFACT_ROOT", "./data/sites"),
                public_base: env_or("PUBLIC_BASE_URL", "http://localhost:3000/sites"),
            },
            "s3" => StoreConfig::S3 {
                bucket: std::env::var("S3_BUCKET").map_err(|_| {
                    CoreError::Validation(
                        "S3_BUCKET must be set when ARTIFACT_STORE=s3".into(),
                    )
                })?,
                public_base: std::env::var("PUBLIC_BASE_URL").ok().filter(|s| !s.is_empty()),
            },
            other => {
                return Err(CoreError::Validation(format!(
                    "Unknown ARTIFACT_STORE '{other}'. Must be one of: local, s3"
                )));
            }
        };

        let renderer = RendererConfig {
            program: env_or("RENDERER_CMD", "node"),
            args: env_or("RENDERER_ARGS", "renderer/render.js")
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            timeout: Duration::from_secs(parse_env("RENDERER_TIMEOUT_SECS", "30")?),
        };

        let retention = RetentionConfig {
            keep_versions: parse_env("RETENTION_KEEP_VERSIONS", "5")?,
            queue_depth: parse_env("RETENTION_QUEUE_DEPTH", "64")?,
        };

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            base_domain,
            store,
            renderer,
            retention,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, CoreError> {
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|_| CoreError::Validation(format!("{key} must be a valid number")))
}
