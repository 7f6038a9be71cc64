use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use crate::adapter::{FileUpload, UploadBody};
use crate::error::StoreError;
use crate::providers::s3_client::store_error;
use crate::providers::StoreResult;

/// Put an object, replacing whatever is stored at `key`
pub async fn put_object(
    client: &Client,
    bucket: &str,
    key: &str,
    upload: FileUpload,
) -> StoreResult<()> {
    let body = match upload.body {
        UploadBody::Bytes(data) => ByteStream::from(data),
        UploadBody::Path(path) => ByteStream::from_path(&path)
            .await
            .map_err(|e| StoreError::Local(format!("Failed to read {}: {}", path.display(), e)))?,
    };

    let mut request = client.put_object().bucket(bucket).key(key).body(body);

    if let Some(ct) = upload.content_type.as_deref().filter(|ct| !ct.is_empty()) {
        request = request.content_type(ct);
    }

    request.send().await.map_err(store_error)?;
    Ok(())
}

/// Delete a single object
pub async fn delete_object(client: &Client, bucket: &str, key: &str) -> StoreResult<()> {
    client
        .delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(store_error)?;
    Ok(())
}

/// Server-side copy within one bucket
pub async fn copy_object(
    client: &Client,
    bucket: &str,
    source_key: &str,
    dest_key: &str,
) -> StoreResult<()> {
    client
        .copy_object()
        .bucket(bucket)
        .copy_source(copy_source(bucket, source_key))
        .key(dest_key)
        .send()
        .await
        .map_err(store_error)?;

    Ok(())
}

/// `bucket/key` with the key URL-encoded, slashes kept as separators.
fn copy_source(bucket: &str, key: &str) -> String {
    let encoded: Vec<String> = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect();
    format!("{}/{}", bucket, encoded.join("/"))
}
