//! Object store backends
//!
//! The adapter only relies on the operations of [`ObjectStore`]:
//! - `aws`: S3 (and S3-compatible endpoints) through the AWS SDK
//! - `memory`: in-process store with credential checks and fault injection

pub mod aws;
pub mod memory;
mod s3_client;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

use crate::adapter::{Credentials, FileUpload};
use crate::error::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

/// A listing record as the remote store returned it; any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteObject {
    pub key: Option<String>,
    pub size: Option<i64>,
    pub last_modified: Option<DateTime<Utc>>,
    pub etag: Option<String>,
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// First page of the bucket listing, in the order the store returns it.
    async fn list_objects(&self, bucket: &str, max_keys: Option<i32>)
        -> StoreResult<Vec<RemoteObject>>;

    async fn put_object(&self, bucket: &str, key: &str, upload: FileUpload) -> StoreResult<()>;

    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()>;

    async fn copy_object(&self, bucket: &str, source_key: &str, dest_key: &str)
        -> StoreResult<()>;

    /// Signed GET URL for `key`; does not check that the object exists.
    async fn presign_get(&self, bucket: &str, key: &str, expires_in: Duration)
        -> StoreResult<String>;
}

/// Builds a store client for one set of credentials.
pub trait Connector: Send + Sync {
    fn connect(&self, credentials: &Credentials) -> Arc<dyn ObjectStore>;
}
