//! Snapshot generation.
//!
//! [`SnapshotGenerator`] turns an invitation's current data into an
//! immutable [`SnapshotBundle`](invita_core::bundle::SnapshotBundle). The
//! production implementation, [`SubprocessRenderer`], invokes an external
//! rendering process over a JSON stdin/stdout contract; any other
//! implementation is acceptable as long as it is a pure function of the
//! invitation data at call time.

use invita_core::bundle::SnapshotBundle;

mod subprocess;
mod wire;

pub use subprocess::SubprocessRenderer;
pub use wire::{RenderRequest, RenderRequestInvitation, RenderResponse, RenderResponseAsset};

/// Errors from snapshot generation. All of them abort the publish attempt
/// before any storage write.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The renderer process could not be spawned or piped.
    #[error("Failed to run renderer: {0}")]
    Io(#[from] std::io::Error),

    /// The renderer exceeded its configured timeout and was killed.
    #[error("Renderer timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    /// The renderer exited non-zero. Stderr is carried for diagnostics.
    #[error("Renderer failed with exit code {exit_code}: {stderr}")]
    Failed { exit_code: i32, stderr: String },

    /// Stdout did not parse against the expected response shape (or an
    /// asset body was not valid base64).
    #[error("Renderer produced malformed output: {0}")]
    MalformedOutput(String),
}

/// Produces one immutable snapshot bundle per invocation.
#[async_trait::async_trait]
pub trait SnapshotGenerator: Send + Sync {
    /// Render the invitation identified by `layout_id` + `data` into a
    /// bundle. Must hold no hidden state and produce no partial results.
    async fn generate_bundle(
        &self,
        layout_id: &str,
        data: &serde_json::Value,
    ) -> Result<SnapshotBundle, RenderError>;
}
