//! S3-compatible artifact store for production.
//!
//! Uses the same key namespace as the local backend: objects under
//! `sites/<subdomain>/v<version>/...` in one bucket. Version discovery
//! relies on delimiter listings; deletion batches through `DeleteObjects`.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{Delete, ObjectIdentifier};
use aws_sdk_s3::Client;

use invita_core::artifact_key::{validate_artifact_key, version_prefix};
use invita_core::types::Version;

use crate::{parse_version_segment, ArtifactStore, StoreError};

/// Maximum keys per `DeleteObjects` request (S3 API limit is 1000).
const DELETE_BATCH: usize = 1000;

/// Artifact store backed by an S3-compatible bucket.
pub struct S3Store {
    client: Client,
    bucket: String,
    /// Public URL prefix for stored objects. `None` in edge-worker
    /// deployments where the CDN constructs URLs itself.
    public_base: Option<String>,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>, public_base: Option<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_base: public_base.map(|b| b.trim_end_matches('/').to_string()),
        }
    }

    /// Construct a store from the ambient AWS environment config.
    pub async fn from_env(bucket: impl Into<String>, public_base: Option<String>) -> Self {
        let config = aws_config::load_from_env().await;
        Self::new(Client::new(&config), bucket, public_base)
    }

    /// List every key under `prefix`, following continuation tokens.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let resp = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| StoreError::S3(e.to_string()))?;

            for object in resp.contents() {
                if let Some(key) = object.key() {
                    keys.push(key.to_string());
                }
            }

            match resp.next_continuation_token() {
                Some(token) => continuation = Some(token.to_string()),
                None => break,
            }
        }

        Ok(keys)
    }
}

#[async_trait::async_trait]
impl ArtifactStore for S3Store {
    async fn put(
        &self,
        key: &str,
        content_type: &str,
        cache_control: &str,
        body: Vec<u8>,
    ) -> Result<(), StoreError> {
        validate_artifact_key(key)?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .cache_control(cache_control)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StoreError::S3(e.to_string()))?;

        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        match &self.public_base {
            Some(base) => format!("{base}/{key}"),
            None => String::new(),
        }
    }

    async fn list_versions(&self, subdomain: &str) -> Result<Vec<Version>, StoreError> {
        let prefix = format!("sites/{subdomain}/");
        let mut versions = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let resp = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(&prefix)
                .delimiter("/")
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| StoreError::S3(e.to_string()))?;

            for common in resp.common_prefixes() {
                // Common prefixes look like `sites/<sub>/v3/`.
                let segment = common
                    .prefix()
                    .and_then(|p| p.strip_prefix(&prefix))
                    .map(|p| p.trim_end_matches('/'));
                if let Some(v) = segment.and_then(parse_version_segment) {
                    versions.push(v);
                }
            }

            match resp.next_continuation_token() {
                Some(token) => continuation = Some(token.to_string()),
                None => break,
            }
        }

        versions.sort_unstable_by(|a, b| b.cmp(a));
        Ok(versions)
    }

    async fn delete_version(&self, subdomain: &str, version: Version) -> Result<(), StoreError> {
        let prefix = format!("{}/", version_prefix(subdomain, version));
        let keys = self.list_keys(&prefix).await?;

        for chunk in keys.chunks(DELETE_BATCH) {
            let objects: Vec<ObjectIdentifier> = chunk
                .iter()
                .map(|key| {
                    ObjectIdentifier::builder()
                        .key(key)
                        .build()
                        .map_err(|e| StoreError::S3(e.to_string()))
                })
                .collect::<Result<_, _>>()?;

            let delete = Delete::builder()
                .set_objects(Some(objects))
                .build()
                .map_err(|e| StoreError::S3(e.to_string()))?;

            self.client
                .delete_objects()
                .bucket(&self.bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|e| StoreError::S3(e.to_string()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Network-dependent behaviour is covered by the interchangeable
    // MemoryStore/LocalStore tests; here we only pin URL construction.

    fn client() -> Client {
        let config = aws_sdk_s3::Config::builder()
            .behavior_version(aws_sdk_s3::config::BehaviorVersion::latest())
            .region(aws_sdk_s3::config::Region::new("us-east-1"))
            .build();
        Client::from_conf(config)
    }

    #[test]
    fn public_url_with_base() {
        let s = S3Store::new(client(), "bucket", Some("https://cdn.invita.site/".into()));
        assert_eq!(
            s.public_url("sites/my-wedding/v1/index.html"),
            "https://cdn.invita.site/sites/my-wedding/v1/index.html"
        );
    }

    #[test]
    fn public_url_empty_without_base() {
        let s = S3Store::new(client(), "bucket", None);
        assert_eq!(s.public_url("sites/my-wedding/v1/index.html"), "");
    }
}
