//! Storage adapter - the single point of contact with the remote bucket
//!
//! - `types`: credentials, listing entries, bucket summary, uploads
//!
//! The adapter holds at most one active configuration. Every operation reads that
//! configuration once, then talks to the store without holding any lock.

mod types;

pub use types::{BucketSummary, Credentials, FileUpload, ObjectEntry, UploadBody};

use chrono::Utc;
use log::{debug, info};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::error::AdapterError;
use crate::providers::{Connector, ObjectStore, RemoteObject};

pub type AdapterResult<T> = Result<T, AdapterError>;

/// Validity of download URLs
pub const DOWNLOAD_URL_TTL: Duration = Duration::from_secs(3600);

#[derive(Clone)]
struct ActiveConfig {
    credentials: Credentials,
    store: Arc<dyn ObjectStore>,
}

pub struct StorageAdapter {
    connector: Box<dyn Connector>,
    active: RwLock<Option<ActiveConfig>>,
}

impl StorageAdapter {
    pub fn new(connector: impl Connector + 'static) -> Self {
        Self {
            connector: Box::new(connector),
            active: RwLock::new(None),
        }
    }

    /// Replace the active client and configuration. No validation happens here.
    pub fn configure(&self, credentials: Credentials) {
        let store = self.connector.connect(&credentials);
        info!(
            "adapter: configured bucket={} region={}",
            credentials.bucket_name, credentials.region
        );
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = Some(ActiveConfig {
            credentials,
            store,
        });
    }

    /// Drop the active configuration; later calls fail with `NotConfigured`.
    pub fn reset(&self) {
        *self.active.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_configured(&self) -> bool {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|active| active.credentials.clone())
    }

    fn active(&self) -> AdapterResult<ActiveConfig> {
        self.active
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(AdapterError::NotConfigured)
    }

    /// Minimal listing (one key) against the configured bucket.
    pub async fn test_connection(&self) -> AdapterResult<bool> {
        let active = self.active()?;
        active
            .store
            .list_objects(&active.credentials.bucket_name, Some(1))
            .await?;
        Ok(true)
    }

    /// First page of the bucket listing, in remote order.
    pub async fn list_objects(&self) -> AdapterResult<Vec<ObjectEntry>> {
        let active = self.active()?;
        let remote = active
            .store
            .list_objects(&active.credentials.bucket_name, None)
            .await?;
        debug!(
            "adapter: listed {} objects in {}",
            remote.len(),
            active.credentials.bucket_name
        );
        Ok(remote.into_iter().map(into_entry).collect())
    }

    /// Summary derived from a fresh listing.
    pub async fn get_bucket_info(&self) -> AdapterResult<BucketSummary> {
        let credentials = self.active()?.credentials;
        let objects = self.list_objects().await?;

        Ok(BucketSummary {
            name: credentials.bucket_name,
            region: credentials.region,
            object_count: objects.len(),
            total_size: objects.iter().map(|obj| obj.size).sum(),
        })
    }

    /// Delete exactly one key. Deleting a folder marker leaves its contents alone.
    pub async fn delete_object(&self, key: &str) -> AdapterResult<()> {
        let active = self.active()?;
        active
            .store
            .delete_object(&active.credentials.bucket_name, key)
            .await?;
        Ok(())
    }

    /// Upload `file` to `key`, overwriting any existing object.
    pub async fn upload_file(&self, file: FileUpload, key: &str) -> AdapterResult<()> {
        let active = self.active()?;
        active
            .store
            .put_object(&active.credentials.bucket_name, key, file)
            .await?;
        Ok(())
    }

    /// Create a zero-byte folder marker; a trailing "/" is added when missing.
    pub async fn create_folder(&self, name: &str) -> AdapterResult<()> {
        let key = folder_key(name);
        self.upload_file(FileUpload::empty(), &key).await
    }

    /// Copy to `new_key`, then delete `old_key`.
    ///
    /// Not atomic: if the delete fails after a successful copy, both objects exist
    /// and the error is returned. If the copy fails, the original is untouched.
    pub async fn rename_object(&self, old_key: &str, new_key: &str) -> AdapterResult<()> {
        let active = self.active()?;
        if old_key == new_key {
            return Ok(());
        }

        let bucket = &active.credentials.bucket_name;
        active.store.copy_object(bucket, old_key, new_key).await?;
        active.store.delete_object(bucket, old_key).await?;
        Ok(())
    }

    /// Signed GET URL valid for [`DOWNLOAD_URL_TTL`]. The key is not checked.
    pub async fn get_download_url(&self, key: &str) -> AdapterResult<String> {
        let active = self.active()?;
        let url = active
            .store
            .presign_get(&active.credentials.bucket_name, key, DOWNLOAD_URL_TTL)
            .await?;
        Ok(url)
    }
}

fn folder_key(name: &str) -> String {
    if name.ends_with('/') {
        name.to_string()
    } else {
        format!("{}/", name)
    }
}

fn into_entry(obj: RemoteObject) -> ObjectEntry {
    ObjectEntry {
        key: obj.key.unwrap_or_default(),
        size: obj.size.and_then(|s| u64::try_from(s).ok()).unwrap_or(0),
        last_modified: obj.last_modified.unwrap_or_else(Utc::now),
        etag: obj.etag.unwrap_or_default(),
    }
}
