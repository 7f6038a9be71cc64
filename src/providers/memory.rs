//! In-process object store
//!
//! Behaves like a single S3 account: buckets must exist, credentials are checked
//! on every request, keys list in lexicographic order. Failures can be queued per
//! operation to exercise error paths, and every request is recorded.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::adapter::{Credentials, FileUpload, UploadBody};
use crate::error::StoreError;
use crate::providers::{Connector, ObjectStore, RemoteObject, StoreResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    List,
    Put,
    Delete,
    Copy,
    Presign,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: Option<String>,
    pub last_modified: DateTime<Utc>,
    pub etag: String,
}

impl StoredObject {
    fn new(data: Bytes, content_type: Option<String>) -> Self {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        Self {
            etag: format!("\"{:016x}\"", hasher.finish()),
            data,
            content_type,
            last_modified: Utc::now(),
        }
    }
}

#[derive(Default)]
struct Inner {
    access_key_id: Option<String>,
    secret_access_key: Option<String>,
    buckets: HashMap<String, BTreeMap<String, StoredObject>>,
    faults: HashMap<StoreOperation, VecDeque<StoreError>>,
    requests: Vec<StoreOperation>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// A store that accepts any credentials.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// A store that only accepts the given key pair.
    pub fn with_credentials(access_key_id: &str, secret_access_key: &str) -> Arc<Self> {
        let store = Self::default();
        {
            let mut inner = store.lock();
            inner.access_key_id = Some(access_key_id.to_string());
            inner.secret_access_key = Some(secret_access_key.to_string());
        }
        Arc::new(store)
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create_bucket(&self, name: &str) {
        self.lock().buckets.entry(name.to_string()).or_default();
    }

    /// Seed an object without going through a request.
    pub fn insert(&self, bucket: &str, key: &str, data: impl Into<Bytes>) {
        self.lock()
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), StoredObject::new(data.into(), None));
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<StoredObject> {
        self.lock().buckets.get(bucket)?.get(key).cloned()
    }

    pub fn keys(&self, bucket: &str) -> Vec<String> {
        self.lock()
            .buckets
            .get(bucket)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Make the next `op` request fail with `error`. Queued failures are consumed in order.
    pub fn fail_next(&self, op: StoreOperation, error: StoreError) {
        self.lock().faults.entry(op).or_default().push_back(error);
    }

    pub fn requests(&self) -> Vec<StoreOperation> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self, op: StoreOperation) -> usize {
        self.lock().requests.iter().filter(|r| **r == op).count()
    }

    /// Record the request and run the checks every request goes through.
    fn begin(
        &self,
        op: StoreOperation,
        credentials: &Credentials,
    ) -> StoreResult<MutexGuard<'_, Inner>> {
        let mut inner = self.lock();
        inner.requests.push(op);

        if let Some(expected) = &inner.access_key_id {
            if *expected != credentials.access_key_id {
                return Err(StoreError::service(
                    "InvalidAccessKeyId",
                    "The AWS Access Key Id you provided does not exist in our records.",
                ));
            }
        }
        if let Some(expected) = &inner.secret_access_key {
            if *expected != credentials.secret_access_key {
                return Err(StoreError::service(
                    "SignatureDoesNotMatch",
                    "The request signature we calculated does not match the signature you provided.",
                ));
            }
        }

        if let Some(err) = inner.faults.get_mut(&op).and_then(VecDeque::pop_front) {
            return Err(err);
        }

        Ok(inner)
    }
}

fn bucket_mut<'a>(
    inner: &'a mut Inner,
    bucket: &str,
) -> StoreResult<&'a mut BTreeMap<String, StoredObject>> {
    inner
        .buckets
        .get_mut(bucket)
        .ok_or_else(|| StoreError::service("NoSuchBucket", "The specified bucket does not exist"))
}

/// Hands out [`MemorySession`]s bound to the credentials they were created with.
#[derive(Clone)]
pub struct MemoryConnector {
    store: Arc<MemoryStore>,
}

impl MemoryConnector {
    pub fn new(store: Arc<MemoryStore>) -> Self {
        Self { store }
    }
}

impl Connector for MemoryConnector {
    fn connect(&self, credentials: &Credentials) -> Arc<dyn ObjectStore> {
        Arc::new(MemorySession {
            store: Arc::clone(&self.store),
            credentials: credentials.clone(),
        })
    }
}

pub struct MemorySession {
    store: Arc<MemoryStore>,
    credentials: Credentials,
}

#[async_trait]
impl ObjectStore for MemorySession {
    async fn list_objects(
        &self,
        bucket: &str,
        max_keys: Option<i32>,
    ) -> StoreResult<Vec<RemoteObject>> {
        let mut inner = self.store.begin(StoreOperation::List, &self.credentials)?;
        let objects = bucket_mut(&mut inner, bucket)?;
        let limit = max_keys
            .and_then(|max| usize::try_from(max).ok())
            .unwrap_or(1000);

        Ok(objects
            .iter()
            .take(limit)
            .map(|(key, obj)| RemoteObject {
                key: Some(key.clone()),
                size: i64::try_from(obj.data.len()).ok(),
                last_modified: Some(obj.last_modified),
                etag: Some(obj.etag.clone()),
            })
            .collect())
    }

    async fn put_object(&self, bucket: &str, key: &str, upload: FileUpload) -> StoreResult<()> {
        let data = match upload.body {
            UploadBody::Bytes(data) => data,
            UploadBody::Path(path) => tokio::fs::read(&path)
                .await
                .map(Bytes::from)
                .map_err(|e| StoreError::Local(format!("Failed to read {}: {}", path.display(), e)))?,
        };

        let mut inner = self.store.begin(StoreOperation::Put, &self.credentials)?;
        bucket_mut(&mut inner, bucket)?
            .insert(key.to_string(), StoredObject::new(data, upload.content_type));
        Ok(())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()> {
        let mut inner = self.store.begin(StoreOperation::Delete, &self.credentials)?;
        // Deleting a missing key succeeds, as on S3.
        bucket_mut(&mut inner, bucket)?.remove(key);
        Ok(())
    }

    async fn copy_object(&self, bucket: &str, source_key: &str, dest_key: &str) -> StoreResult<()> {
        let mut inner = self.store.begin(StoreOperation::Copy, &self.credentials)?;
        let objects = bucket_mut(&mut inner, bucket)?;
        let source = objects
            .get(source_key)
            .ok_or_else(|| StoreError::service("NoSuchKey", "The specified key does not exist."))?;
        let copy = StoredObject::new(source.data.clone(), source.content_type.clone());
        objects.insert(dest_key.to_string(), copy);
        Ok(())
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StoreResult<String> {
        self.store.begin(StoreOperation::Presign, &self.credentials)?;
        Ok(format!(
            "http://memory.localhost/{}/{}?X-Amz-Credential={}&X-Amz-Expires={}",
            bucket,
            urlencoding::encode(key),
            urlencoding::encode(&self.credentials.access_key_id),
            expires_in.as_secs()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("AKIA", "secret", "us-east-1", "demo")
    }

    #[tokio::test]
    async fn rejects_unknown_access_key() {
        let store = MemoryStore::with_credentials("AKIA", "secret");
        store.create_bucket("demo");
        let session = MemoryConnector::new(store).connect(&Credentials::new(
            "OTHER",
            "secret",
            "us-east-1",
            "demo",
        ));

        let err = session.list_objects("demo", None).await.unwrap_err();
        assert_eq!(err.code(), Some("InvalidAccessKeyId"));
    }

    #[tokio::test]
    async fn missing_bucket_reports_no_such_bucket() {
        let store = MemoryStore::new();
        let session = MemoryConnector::new(store).connect(&creds());

        let err = session.list_objects("demo", Some(1)).await.unwrap_err();
        assert_eq!(err.code(), Some("NoSuchBucket"));
    }

    #[tokio::test]
    async fn queued_faults_fire_once() {
        let store = MemoryStore::new();
        store.create_bucket("demo");
        store.fail_next(StoreOperation::List, StoreError::Network("down".to_string()));
        let session = MemoryConnector::new(Arc::clone(&store)).connect(&creds());

        assert!(session.list_objects("demo", None).await.is_err());
        assert!(session.list_objects("demo", None).await.is_ok());
        assert_eq!(store.request_count(StoreOperation::List), 2);
    }

    #[tokio::test]
    async fn listing_is_ordered_and_limited() {
        let store = MemoryStore::new();
        store.insert("demo", "b.txt", "bb");
        store.insert("demo", "a.txt", "a");
        let session = MemoryConnector::new(store).connect(&creds());

        let keys: Vec<_> = session
            .list_objects("demo", None)
            .await
            .unwrap()
            .into_iter()
            .filter_map(|o| o.key)
            .collect();
        assert_eq!(keys, vec!["a.txt", "b.txt"]);

        let first = session.list_objects("demo", Some(1)).await.unwrap();
        assert_eq!(first.len(), 1);
    }
}
