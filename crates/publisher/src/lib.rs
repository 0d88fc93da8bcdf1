//! The versioned site-publishing pipeline.
//!
//! [`SitePublisher`] orchestrates publish, rollback, and version listing
//! against the artifact store, the snapshot generator, and the published
//! site registry. [`retention`] provides the background pruning worker fed
//! by a bounded queue.
//!
//! Correctness rests on one total order per publish attempt: the
//! `index.html` write strictly precedes all other artifact writes, and the
//! pointer update strictly follows all of them. A version becomes visible
//! only at the pointer update, so observers can never see a version whose
//! index object does not exist.

mod error;
mod publish;
mod resolve;
pub mod retention;
mod rollback;
mod versions;

pub use error::PublishError;
pub use publish::PublishOutcome;
pub use resolve::ResolvedSite;
pub use retention::{cleanup_channel, CleanupQueue, CleanupRequest, RetentionWorker};

use std::sync::Arc;

use invita_db::DbPool;
use invita_renderer::SnapshotGenerator;
use invita_store::ArtifactStore;

/// Cache-control for pointer-adjacent objects that must revalidate on every
/// fetch (`index.html`, `manifest.json`).
pub(crate) const CACHE_REVALIDATE: &str = "no-cache";

/// Cache-control for immutable version-scoped artifacts.
pub(crate) const CACHE_IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Placeholder client script written alongside every snapshot so layouts
/// can assume the file exists.
pub(crate) const APP_JS_PLACEHOLDER: &str = "// reserved for interactive features\n";

/// Orchestrates all mutations of the publish pointer.
///
/// Explicitly constructed with its collaborators (no global state); cheap
/// to clone and share across handlers.
#[derive(Clone)]
pub struct SitePublisher {
    pool: DbPool,
    store: Arc<dyn ArtifactStore>,
    generator: Arc<dyn SnapshotGenerator>,
    cleanup: CleanupQueue,
}

impl SitePublisher {
    pub fn new(
        pool: DbPool,
        store: Arc<dyn ArtifactStore>,
        generator: Arc<dyn SnapshotGenerator>,
        cleanup: CleanupQueue,
    ) -> Self {
        Self {
            pool,
            store,
            generator,
            cleanup,
        }
    }

    pub(crate) fn pool(&self) -> &DbPool {
        &self.pool
    }

    pub(crate) fn store(&self) -> &dyn ArtifactStore {
        self.store.as_ref()
    }

    pub(crate) fn generator(&self) -> &dyn SnapshotGenerator {
        self.generator.as_ref()
    }

    pub(crate) fn cleanup(&self) -> &CleanupQueue {
        &self.cleanup
    }
}
