//! In-memory artifact store used by tests.
//!
//! Implements the exact same validation and namespace conventions as the
//! real backends so the publishing pipeline can be exercised without a
//! filesystem or bucket. Supports injecting a write failure on a chosen
//! key to test partial-upload abort behaviour.

use std::collections::BTreeMap;
use std::sync::Mutex;

use invita_core::artifact_key::{validate_artifact_key, version_prefix};
use invita_core::error::CoreError;
use invita_core::types::Version;

use crate::{parse_version_segment, ArtifactStore, StoreError};

/// One stored object with its metadata.
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub content_type: String,
    pub cache_control: String,
    pub body: Vec<u8>,
}

/// Map-backed artifact store.
#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<BTreeMap<String, StoredObject>>,
    /// When set, `put` fails for any key ending in this suffix.
    fail_on_suffix: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future `put` of a key ending in `suffix` fail.
    pub fn fail_puts_ending_in(&self, suffix: &str) {
        *self.fail_on_suffix.lock().unwrap() = Some(suffix.to_string());
    }

    /// Clear the injected failure.
    pub fn clear_failures(&self) {
        *self.fail_on_suffix.lock().unwrap() = None;
    }

    /// Fetch a stored object by key.
    pub fn get(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    /// True when `key` holds an object.
    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.objects.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait::async_trait]
impl ArtifactStore for MemoryStore {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        cache_control: &str,
        body: Vec<u8>,
    ) -> Result<(), StoreError> {
        validate_artifact_key(key)?;

        if let Some(suffix) = self.fail_on_suffix.lock().unwrap().as_deref() {
            if key.ends_with(suffix) {
                return Err(StoreError::S3(format!("injected failure for '{key}'")));
            }
        }

        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                content_type: content_type.to_string(),
                cache_control: cache_control.to_string(),
                body,
            },
        );
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("memory://{key}")
    }

    async fn list_versions(&self, subdomain: &str) -> Result<Vec<Version>, StoreError> {
        let prefix = format!("sites/{subdomain}/");
        let objects = self.objects.lock().unwrap();

        let mut versions: Vec<Version> = objects
            .keys()
            .filter_map(|key| key.strip_prefix(&prefix))
            .filter_map(|rest| rest.split('/').next())
            .filter_map(parse_version_segment)
            .collect();

        versions.sort_unstable_by(|a, b| b.cmp(a));
        versions.dedup();
        Ok(versions)
    }

    async fn delete_version(&self, subdomain: &str, version: Version) -> Result<(), StoreError> {
        if subdomain.is_empty() {
            return Err(StoreError::InvalidKey(CoreError::Validation(
                "Subdomain must not be empty".into(),
            )));
        }
        let prefix = format!("{}/", version_prefix(subdomain, version));
        self.objects
            .lock()
            .unwrap()
            .retain(|key, _| !key.starts_with(&prefix));
        Ok(())
    }
}
