//! Publisher error type.

use invita_core::error::CoreError;
use invita_renderer::RenderError;
use invita_store::StoreError;

/// Everything that can abort a publish, rollback, or listing.
///
/// The ordering guarantees of the pipeline mean each variant implies a
/// well-defined blast radius: validation/authorization errors happen
/// before any I/O, render errors before any storage write, store errors
/// before the pointer update.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Validation, authorization, not-found, or conflict.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Registry read/write failure.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Artifact storage failure. Partial writes for the attempted version
    /// may remain as unreferenced orphans.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Snapshot generation failure; nothing was written.
    #[error("Snapshot generation failed: {0}")]
    Render(#[from] RenderError),
}
