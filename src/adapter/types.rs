//! Adapter types: credentials, listing entries and uploads

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::media::content_type_for;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket_name: String,
}

impl Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
        bucket_name: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
            bucket_name: bucket_name.into(),
        }
    }
}

// Keep the secret out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("region", &self.region)
            .field("bucket_name", &self.bucket_name)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectEntry {
    pub key: String,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
    pub etag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSummary {
    pub name: String,
    pub region: String,
    pub object_count: usize,
    pub total_size: u64,
}

/// Content handed to `upload_file`
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub content_type: Option<String>,
    pub body: UploadBody,
}

#[derive(Debug, Clone)]
pub enum UploadBody {
    Bytes(Bytes),
    /// Streamed from disk when the request is sent
    Path(PathBuf),
}

impl FileUpload {
    pub fn from_bytes(data: impl Into<Bytes>, content_type: Option<&str>) -> Self {
        Self {
            content_type: content_type.map(str::to_string),
            body: UploadBody::Bytes(data.into()),
        }
    }

    /// Upload a local file, taking the content type from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self {
            content_type: Some(content_type_for(path)),
            body: UploadBody::Path(path.to_path_buf()),
        }
    }

    pub fn empty() -> Self {
        Self::from_bytes(Bytes::new(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_debug_redacts_secret() {
        let creds = Credentials::new("AKIA123", "very-secret", "us-east-1", "demo");
        let rendered = format!("{:?}", creds);
        assert!(rendered.contains("AKIA123"));
        assert!(!rendered.contains("very-secret"));
    }

    #[test]
    fn file_upload_from_path_guesses_content_type() {
        let upload = FileUpload::from_path("/tmp/cat.PNG");
        assert_eq!(upload.content_type.as_deref(), Some("image/png"));
        assert!(matches!(upload.body, UploadBody::Path(_)));
    }
}
