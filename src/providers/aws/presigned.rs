use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use std::time::Duration;

use crate::error::StoreError;
use crate::providers::s3_client::store_error;
use crate::providers::StoreResult;

/// Generate a presigned GET URL. Signing is local; the key is not looked up.
pub async fn generate_presigned_url(
    client: &Client,
    bucket: &str,
    key: &str,
    expires_in: Duration,
) -> StoreResult<String> {
    let presigning_config = PresigningConfig::builder()
        .expires_in(expires_in)
        .build()
        .map_err(|e| StoreError::Local(format!("Invalid presigning config: {}", e)))?;

    let presigned_request = client
        .get_object()
        .bucket(bucket)
        .key(key)
        .presigned(presigning_config)
        .await
        .map_err(store_error)?;

    Ok(presigned_request.uri().to_string())
}
