//! Filesystem-backed artifact store for development.
//!
//! Keys map directly to paths under a configured root directory. Content
//! type and cache control are accepted for interface parity but not
//! persisted; the dev static-file server infers them from extensions.

use std::path::{Path, PathBuf};

use invita_core::artifact_key::validate_artifact_key;
use invita_core::types::Version;

use crate::{parse_version_segment, ArtifactStore, StoreError};

/// Artifact store rooted at a local directory.
pub struct LocalStore {
    root: PathBuf,
    /// URL prefix joined in front of keys by [`ArtifactStore::public_url`].
    public_base: String,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>, public_base: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn site_dir(&self, subdomain: &str) -> PathBuf {
        self.root.join("sites").join(subdomain)
    }

    fn version_dir(&self, subdomain: &str, version: Version) -> PathBuf {
        self.site_dir(subdomain).join(format!("v{version}"))
    }
}

#[async_trait::async_trait]
impl ArtifactStore for LocalStore {
    async fn put(
        &self,
        key: &str,
        _content_type: &str,
        _cache_control: &str,
        body: Vec<u8>,
    ) -> Result<(), StoreError> {
        validate_artifact_key(key)?;

        // The key is canonical and relative, so the join cannot escape root.
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, body).await?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base)
    }

    async fn list_versions(&self, subdomain: &str) -> Result<Vec<Version>, StoreError> {
        let dir = self.site_dir(subdomain);
        let mut versions = Vec::new();

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            // A site with no published versions simply has no directory.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(versions),
            Err(e) => return Err(e.into()),
        };

        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            if let Some(v) = entry.file_name().to_str().and_then(parse_version_segment) {
                versions.push(v);
            }
        }

        versions.sort_unstable_by(|a, b| b.cmp(a));
        Ok(versions)
    }

    async fn delete_version(&self, subdomain: &str, version: Version) -> Result<(), StoreError> {
        let dir = self.version_dir(subdomain, version);
        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(()),
            // Already gone: deletion is idempotent.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(root: &Path) -> LocalStore {
        LocalStore::new(root, "http://localhost:3000/sites-root")
    }

    #[tokio::test]
    async fn put_writes_under_root() {
        let tmp = tempfile::tempdir().unwrap();
        let s = store(tmp.path());

        s.put(
            "sites/my-wedding/v1/index.html",
            "text/html",
            "no-cache",
            b"<html></html>".to_vec(),
        )
        .await
        .unwrap();

        let on_disk =
            std::fs::read(tmp.path().join("sites/my-wedding/v1/index.html")).unwrap();
        assert_eq!(on_disk, b"<html></html>");
    }

    #[tokio::test]
    async fn put_rejects_traversal_before_io() {
        let tmp = tempfile::tempdir().unwrap();
        let s = store(tmp.path());

        let err = s
            .put("sites/../../etc/passwd", "text/plain", "no-cache", vec![])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidKey(_)));

        // Nothing at all was created.
        assert!(std::fs::read_dir(tmp.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn put_overwrites_existing_key() {
        let tmp = tempfile::tempdir().unwrap();
        let s = store(tmp.path());
        let key = "sites/my-wedding/v1/index.html";

        s.put(key, "text/html", "no-cache", b"one".to_vec())
            .await
            .unwrap();
        s.put(key, "text/html", "no-cache", b"two".to_vec())
            .await
            .unwrap();

        assert_eq!(std::fs::read(tmp.path().join(key)).unwrap(), b"two");
    }

    #[tokio::test]
    async fn list_versions_descending() {
        let tmp = tempfile::tempdir().unwrap();
        let s = store(tmp.path());

        for v in [1, 3, 2] {
            s.put(
                &format!("sites/my-wedding/v{v}/index.html"),
                "text/html",
                "no-cache",
                vec![],
            )
            .await
            .unwrap();
        }

        assert_eq!(s.list_versions("my-wedding").await.unwrap(), vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn list_versions_empty_for_unknown_site() {
        let tmp = tempfile::tempdir().unwrap();
        let s = store(tmp.path());
        assert!(s.list_versions("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_versions_ignores_stray_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let s = store(tmp.path());

        s.put("sites/my-wedding/v1/index.html", "text/html", "no-cache", vec![])
            .await
            .unwrap();
        std::fs::create_dir_all(tmp.path().join("sites/my-wedding/scratch")).unwrap();
        std::fs::write(tmp.path().join("sites/my-wedding/notes.txt"), b"x").unwrap();

        assert_eq!(s.list_versions("my-wedding").await.unwrap(), vec![1]);
    }

    #[tokio::test]
    async fn delete_version_removes_whole_prefix() {
        let tmp = tempfile::tempdir().unwrap();
        let s = store(tmp.path());

        s.put("sites/my-wedding/v1/index.html", "text/html", "no-cache", vec![])
            .await
            .unwrap();
        s.put(
            "sites/my-wedding/v1/assets/a.jpg",
            "image/jpeg",
            "public, max-age=31536000, immutable",
            vec![1],
        )
        .await
        .unwrap();
        s.put("sites/my-wedding/v2/index.html", "text/html", "no-cache", vec![])
            .await
            .unwrap();

        s.delete_version("my-wedding", 1).await.unwrap();

        assert_eq!(s.list_versions("my-wedding").await.unwrap(), vec![2]);
        // Deleting again is a no-op, not an error.
        s.delete_version("my-wedding", 1).await.unwrap();
    }

    #[tokio::test]
    async fn public_url_joins_base() {
        let tmp = tempfile::tempdir().unwrap();
        let s = LocalStore::new(tmp.path(), "http://localhost:3000/sites-root/");
        assert_eq!(
            s.public_url("sites/my-wedding/v1/index.html"),
            "http://localhost:3000/sites-root/sites/my-wedding/v1/index.html"
        );
    }
}
