//! Error types for storage backends, the adapter and the connect boundary

use thiserror::Error;

/// Error returned by an [`ObjectStore`](crate::providers::ObjectStore) backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The remote service answered with an error.
    #[error("{}", service_display(.code.as_deref(), .message))]
    Service {
        code: Option<String>,
        message: String,
    },
    /// The request never got an answer (connect failure, timeout, broken transport).
    #[error("NetworkingError: {0}")]
    Network(String),
    /// Failure on this side of the wire, before any request was sent.
    #[error("{0}")]
    Local(String),
}

fn service_display(code: Option<&str>, message: &str) -> String {
    match code {
        Some(code) if !code.is_empty() => format!("{}: {}", code, message),
        _ => message.to_string(),
    }
}

impl StoreError {
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        StoreError::Service {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    /// Remote error code, when the service supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            StoreError::Service { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

/// Error returned by [`StorageAdapter`](crate::adapter::StorageAdapter) operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdapterError {
    #[error("S3 client not configured")]
    NotConfigured,
    #[error(transparent)]
    Remote(#[from] StoreError),
}

/// Classified connect failure, as shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConnectError {
    #[error("Invalid Access Key ID")]
    InvalidCredentials,
    #[error("Invalid Secret Access Key")]
    InvalidSecret,
    #[error("Bucket not found or access denied")]
    BucketNotFound,
    #[error("Network error. Check your internet connection and credentials.")]
    NetworkError,
    #[error("{0}")]
    Unclassified(String),
}

impl ConnectError {
    /// Classify an adapter failure by its remote code, falling back to the message text.
    pub fn classify(err: &AdapterError) -> Self {
        let store_err = match err {
            AdapterError::Remote(store_err) => store_err,
            AdapterError::NotConfigured => return ConnectError::Unclassified(err.to_string()),
        };

        if let StoreError::Network(_) = store_err {
            return ConnectError::NetworkError;
        }

        if let Some(kind) = store_err.code().and_then(Self::from_code) {
            return kind;
        }

        let message = store_err.to_string();
        if message.contains("InvalidAccessKeyId") {
            ConnectError::InvalidCredentials
        } else if message.contains("SignatureDoesNotMatch") {
            ConnectError::InvalidSecret
        } else if message.contains("NoSuchBucket") {
            ConnectError::BucketNotFound
        } else if message.contains("NetworkingError") || message.contains("fetch") {
            ConnectError::NetworkError
        } else {
            ConnectError::Unclassified(message)
        }
    }

    fn from_code(code: &str) -> Option<Self> {
        match code {
            "InvalidAccessKeyId" => Some(ConnectError::InvalidCredentials),
            "SignatureDoesNotMatch" => Some(ConnectError::InvalidSecret),
            "NoSuchBucket" | "AccessDenied" => Some(ConnectError::BucketNotFound),
            _ => None,
        }
    }
}
