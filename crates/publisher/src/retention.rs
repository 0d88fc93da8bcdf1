//! Background retention cleanup.
//!
//! Publishes enqueue a [`CleanupRequest`] on a bounded channel; the
//! [`RetentionWorker`] drains it until cancellation, pruning every version
//! beyond the newest `keep`. Deletion failures are logged and skipped --
//! cleanup never escalates, never retries within a pass, and never blocks
//! or fails the publish that triggered it.

use std::sync::Arc;

use invita_store::ArtifactStore;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// One unit of cleanup work.
#[derive(Debug)]
pub struct CleanupRequest {
    pub subdomain: String,
}

/// Producer half of the cleanup queue, held by the publisher.
#[derive(Clone)]
pub struct CleanupQueue {
    tx: mpsc::Sender<CleanupRequest>,
}

impl CleanupQueue {
    /// Enqueue cleanup for a subdomain without blocking.
    ///
    /// A full queue drops the request with a warning: retention is an
    /// optimization, and the next publish of the site enqueues again.
    pub fn request(&self, subdomain: String) {
        if let Err(e) = self.tx.try_send(CleanupRequest { subdomain }) {
            tracing::warn!(error = %e, "Retention queue full; dropping cleanup request");
        }
    }
}

/// Build the bounded cleanup channel.
pub fn cleanup_channel(depth: usize) -> (CleanupQueue, mpsc::Receiver<CleanupRequest>) {
    let (tx, rx) = mpsc::channel(depth.max(1));
    (CleanupQueue { tx }, rx)
}

/// Drains the cleanup queue, pruning old versions per subdomain.
pub struct RetentionWorker {
    store: Arc<dyn ArtifactStore>,
    keep: usize,
}

impl RetentionWorker {
    /// `keep` is clamped to at least 1: the live version is never a
    /// deletion candidate.
    pub fn new(store: Arc<dyn ArtifactStore>, keep: usize) -> Self {
        Self {
            store,
            keep: keep.max(1),
        }
    }

    /// Run until `cancel` fires or the queue closes.
    pub async fn run(self, mut rx: mpsc::Receiver<CleanupRequest>, cancel: CancellationToken) {
        tracing::info!(keep = self.keep, "Retention worker started");

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Retention worker stopping");
                    break;
                }
                request = rx.recv() => {
                    match request {
                        Some(request) => self.clean_subdomain(&request.subdomain).await,
                        None => {
                            tracing::info!("Retention queue closed; worker stopping");
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Prune one subdomain: list versions (newest first) and delete the
    /// tail beyond the retention window.
    async fn clean_subdomain(&self, subdomain: &str) {
        let versions = match self.store.list_versions(subdomain).await {
            Ok(versions) => versions,
            Err(e) => {
                tracing::warn!(subdomain, error = %e, "Retention: version listing failed");
                return;
            }
        };

        if versions.len() <= self.keep {
            tracing::debug!(
                subdomain,
                stored = versions.len(),
                "Retention: nothing to prune"
            );
            return;
        }

        for &version in &versions[self.keep..] {
            match self.store.delete_version(subdomain, version).await {
                Ok(()) => {
                    tracing::info!(subdomain, version, "Retention: pruned old version");
                }
                Err(e) => {
                    // Skipped, not retried; the next pass sees it again.
                    tracing::warn!(subdomain, version, error = %e, "Retention: delete failed");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invita_store::MemoryStore;

    async fn seed_versions(store: &MemoryStore, subdomain: &str, versions: &[i64]) {
        for &v in versions {
            store
                .put(
                    &format!("sites/{subdomain}/v{v}/index.html"),
                    "text/html",
                    "no-cache",
                    vec![],
                )
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn prunes_beyond_retention_window() {
        let store = Arc::new(MemoryStore::new());
        seed_versions(&store, "my-wedding", &[1, 2, 3]).await;

        let worker = RetentionWorker::new(store.clone(), 2);
        worker.clean_subdomain("my-wedding").await;

        assert_eq!(store.list_versions("my-wedding").await.unwrap(), vec![3, 2]);
    }

    #[tokio::test]
    async fn keeps_everything_within_window() {
        let store = Arc::new(MemoryStore::new());
        seed_versions(&store, "my-wedding", &[1, 2]).await;

        RetentionWorker::new(store.clone(), 5)
            .clean_subdomain("my-wedding")
            .await;

        assert_eq!(
            store.list_versions("my-wedding").await.unwrap(),
            vec![2, 1]
        );
    }

    #[tokio::test]
    async fn keep_clamped_to_one() {
        let store = Arc::new(MemoryStore::new());
        seed_versions(&store, "my-wedding", &[1, 2]).await;

        RetentionWorker::new(store.clone(), 0)
            .clean_subdomain("my-wedding")
            .await;

        assert_eq!(store.list_versions("my-wedding").await.unwrap(), vec![2]);
    }

    #[tokio::test]
    async fn worker_drains_queue_and_stops_on_cancel() {
        let store = Arc::new(MemoryStore::new());
        seed_versions(&store, "my-wedding", &[1, 2, 3]).await;

        let (queue, rx) = cleanup_channel(8);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(RetentionWorker::new(store.clone(), 1).run(rx, cancel.clone()));

        queue.request("my-wedding".to_string());

        // Wait for the worker to process the request.
        for _ in 0..50 {
            if store.list_versions("my-wedding").await.unwrap() == vec![3] {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        assert_eq!(store.list_versions("my-wedding").await.unwrap(), vec![3]);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn full_queue_drops_instead_of_blocking() {
        let (queue, _rx) = cleanup_channel(1);
        queue.request("one".to_string());
        // Queue is full; this must not block or panic.
        queue.request("two".to_string());
    }
}
