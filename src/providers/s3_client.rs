use aws_config::Region;
use aws_credential_types::Credentials as StaticCredentials;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::Client;

use crate::error::StoreError;

pub struct S3ClientConfig<'a> {
    pub access_key_id: &'a str,
    pub secret_access_key: &'a str,
    pub region: &'a str,
    pub endpoint_url: Option<&'a str>,
    pub force_path_style: bool,
}

/// Build an S3 client. Nothing is sent until the first request, so this cannot fail.
pub fn create_s3_client(config: &S3ClientConfig<'_>) -> Client {
    let credentials = StaticCredentials::new(
        config.access_key_id,
        config.secret_access_key,
        None,
        None,
        "bucket-console",
    );

    // Failed calls are surfaced to the user as-is; no silent retries.
    let mut builder = S3ConfigBuilder::new()
        .credentials_provider(credentials)
        .region(Region::new(config.region.to_string()))
        .retry_config(RetryConfig::disabled());

    if let Some(endpoint_url) = config.endpoint_url {
        builder = builder.endpoint_url(endpoint_url);
    }

    if config.force_path_style {
        builder = builder.force_path_style(true);
    }

    Client::from_conf(builder.build())
}

/// Convert an SDK failure into a [`StoreError`], keeping the remote code and message.
pub(crate) fn store_error<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match &err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => {
            StoreError::Network(DisplayErrorContext(&err).to_string())
        }
        SdkError::ConstructionFailure(_) => StoreError::Local(DisplayErrorContext(&err).to_string()),
        _ => {
            let service = err.as_service_error();
            let code = service.and_then(|e| e.code()).map(str::to_string);
            let message = service
                .and_then(|e| e.message())
                .map(str::to_string)
                .unwrap_or_else(|| DisplayErrorContext(&err).to_string());
            StoreError::Service { code, message }
        }
    }
}
