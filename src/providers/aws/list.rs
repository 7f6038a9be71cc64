use aws_sdk_s3::primitives::DateTime as SdkDateTime;
use aws_sdk_s3::Client;
use chrono::{DateTime, Utc};

use crate::providers::s3_client::store_error;
use crate::providers::{RemoteObject, StoreResult};

/// List the first page of objects in a bucket.
///
/// Folder markers (keys ending in "/") are kept; the console shows them as folders.
pub async fn list_objects(
    client: &Client,
    bucket: &str,
    max_keys: Option<i32>,
) -> StoreResult<Vec<RemoteObject>> {
    let mut request = client.list_objects_v2().bucket(bucket);

    if let Some(max) = max_keys {
        request = request.max_keys(max);
    }

    let response = request.send().await.map_err(store_error)?;

    if response.is_truncated().unwrap_or(false) {
        log::debug!(
            "list_objects: bucket {} has more than {} keys, only the first page is used",
            bucket,
            response.contents().len()
        );
    }

    let objects = response
        .contents()
        .iter()
        .map(|obj| RemoteObject {
            key: obj.key().map(|s| s.to_string()),
            size: obj.size(),
            last_modified: obj.last_modified().and_then(to_chrono),
            etag: obj.e_tag().map(|s| s.to_string()),
        })
        .collect();

    Ok(objects)
}

fn to_chrono(dt: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.secs(), dt.subsec_nanos())
}
