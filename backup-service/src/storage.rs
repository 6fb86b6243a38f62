use crate::errors::{Error, Result};
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::info;

/// One stored backup object as seen in a listing.
#[derive(Debug, Clone)]
pub struct BackupObject {
    pub key: String,
    pub size: i64,
    pub last_modified: DateTime<Utc>,
}

/// The object-storage surface the backup service needs. Implemented by
/// `S3Store` in production and by an in-memory double in tests.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn list(&self, prefix: &str) -> Result<Vec<BackupObject>>;
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;
    async fn get(&self, key: &str) -> Result<Vec<u8>>;
    /// Deleting a key that no longer exists is a success (S3 semantics), so
    /// overlapping cleanup runs racing on the same object stay benign.
    async fn delete(&self, key: &str) -> Result<()>;
}

pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub async fn connect(bucket: String, region: String) -> Self {
        info!("Connecting to S3 bucket {} in {}", bucket, region);

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region))
            .timeout_config(
                aws_config::timeout::TimeoutConfig::builder()
                    .operation_timeout(Duration::from_secs(10))
                    .build(),
            )
            .load()
            .await;

        Self {
            client: Client::new(&sdk_config),
            bucket,
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list(&self, prefix: &str) -> Result<Vec<BackupObject>> {
        let mut objects = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let mut request = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix);
            if let Some(token) = &continuation {
                request = request.continuation_token(token);
            }

            let page = request.send().await.map_err(|e| {
                Error::Storage(format!("list failed: {}", DisplayErrorContext(&e)))
            })?;

            for obj in page.contents() {
                let Some(key) = obj.key() else { continue };
                let last_modified = obj
                    .last_modified()
                    .and_then(|t| DateTime::from_timestamp(t.secs(), t.subsec_nanos()))
                    .unwrap_or_default();
                objects.push(BackupObject {
                    key: key.to_string(),
                    size: obj.size().unwrap_or(0),
                    last_modified,
                });
            }

            continuation = page.next_continuation_token().map(String::from);
            if continuation.is_none() {
                break;
            }
        }

        Ok(objects)
    }

    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                Error::Storage(format!("put {key} failed: {}", DisplayErrorContext(&e)))
            })?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                Error::Storage(format!("get {key} failed: {}", DisplayErrorContext(&e)))
            })?;

        let data = output
            .body
            .collect()
            .await
            .map_err(|e| Error::Storage(format!("read {key} failed: {e}")))?;
        Ok(data.into_bytes().to_vec())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                Error::Storage(format!("delete {key} failed: {}", DisplayErrorContext(&e)))
            })?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    /// In-memory stand-in for S3 used by unit tests.
    #[derive(Default)]
    pub struct MemoryStore {
        objects: Mutex<BTreeMap<String, (Vec<u8>, DateTime<Utc>)>>,
    }

    impl MemoryStore {
        pub fn insert_at(&self, key: &str, body: Vec<u8>, last_modified: DateTime<Utc>) {
            self.objects
                .lock()
                .unwrap()
                .insert(key.to_string(), (body, last_modified));
        }

        pub fn keys(&self) -> Vec<String> {
            self.objects.lock().unwrap().keys().cloned().collect()
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        async fn list(&self, prefix: &str) -> Result<Vec<BackupObject>> {
            Ok(self
                .objects
                .lock()
                .unwrap()
                .iter()
                .filter(|(key, _)| key.starts_with(prefix))
                .map(|(key, (body, last_modified))| BackupObject {
                    key: key.clone(),
                    size: body.len() as i64,
                    last_modified: *last_modified,
                })
                .collect())
        }

        async fn put(&self, key: &str, body: Vec<u8>, _content_type: &str) -> Result<()> {
            self.objects
                .lock()
                .unwrap()
                .insert(key.to_string(), (body, Utc::now()));
            Ok(())
        }

        async fn get(&self, key: &str) -> Result<Vec<u8>> {
            self.objects
                .lock()
                .unwrap()
                .get(key)
                .map(|(body, _)| body.clone())
                .ok_or_else(|| Error::Storage(format!("no such key: {key}")))
        }

        async fn delete(&self, key: &str) -> Result<()> {
            self.objects.lock().unwrap().remove(key);
            Ok(())
        }
    }
}
