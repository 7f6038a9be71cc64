mod list;
mod objects;
mod presigned;
mod types;

pub use list::list_objects;
pub use objects::{copy_object, delete_object, put_object};
pub use presigned::generate_presigned_url;
pub use types::ClientOptions;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::adapter::{Credentials, FileUpload};
use crate::providers::{Connector, ObjectStore, RemoteObject, StoreResult};

/// Creates [`S3Store`] clients, optionally against an S3-compatible endpoint.
#[derive(Debug, Clone, Default)]
pub struct S3Connector {
    options: ClientOptions,
}

impl S3Connector {
    pub fn new(options: ClientOptions) -> Self {
        Self { options }
    }
}

impl Connector for S3Connector {
    fn connect(&self, credentials: &Credentials) -> Arc<dyn ObjectStore> {
        Arc::new(S3Store::new(types::create_client(credentials, &self.options)))
    }
}

#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_objects(
        &self,
        bucket: &str,
        max_keys: Option<i32>,
    ) -> StoreResult<Vec<RemoteObject>> {
        list_objects(&self.client, bucket, max_keys).await
    }

    async fn put_object(&self, bucket: &str, key: &str, upload: FileUpload) -> StoreResult<()> {
        put_object(&self.client, bucket, key, upload).await
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StoreResult<()> {
        delete_object(&self.client, bucket, key).await
    }

    async fn copy_object(&self, bucket: &str, source_key: &str, dest_key: &str) -> StoreResult<()> {
        copy_object(&self.client, bucket, source_key, dest_key).await
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StoreResult<String> {
        generate_presigned_url(&self.client, bucket, key, expires_in).await
    }
}
