use crate::adapter::Credentials;
use crate::providers::s3_client::{create_s3_client, S3ClientConfig};
use aws_sdk_s3::Client;
use serde::{Deserialize, Serialize};

/// Endpoint override for S3-compatible services (MinIO, R2, ...).
///
/// With no host set the client talks to AWS for the credentials' region.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOptions {
    pub endpoint_scheme: Option<String>,
    pub endpoint_host: Option<String>,
    #[serde(default)]
    pub force_path_style: bool,
}

impl ClientOptions {
    /// Point the client at `url` (e.g. `http://127.0.0.1:9000`) with path-style addressing.
    pub fn custom_endpoint(url: &str) -> Self {
        let (scheme, host) = match url.split_once("://") {
            Some((scheme, host)) => (Some(scheme.to_string()), host),
            None => (None, url),
        };
        Self {
            endpoint_scheme: scheme,
            endpoint_host: Some(host.trim_end_matches('/').to_string()),
            force_path_style: true,
        }
    }

    pub fn endpoint_url(&self) -> Option<String> {
        let host = self.endpoint_host.as_ref()?.trim();
        if host.is_empty() {
            return None;
        }
        let scheme = self.endpoint_scheme.as_deref().unwrap_or("https");
        Some(format!("{}://{}", scheme, host))
    }
}

pub(crate) fn create_client(credentials: &Credentials, options: &ClientOptions) -> Client {
    let endpoint_url = options.endpoint_url();
    create_s3_client(&S3ClientConfig {
        access_key_id: &credentials.access_key_id,
        secret_access_key: &credentials.secret_access_key,
        region: &credentials.region,
        endpoint_url: endpoint_url.as_deref(),
        force_path_style: options.force_path_style,
    })
}
