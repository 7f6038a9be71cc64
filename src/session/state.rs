//! Session state exposed to the views

use serde::{Deserialize, Serialize};

use crate::adapter::{BucketSummary, Credentials, ObjectEntry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionPhase {
    #[serde(rename = "disconnected")]
    #[default]
    Disconnected,
    #[serde(rename = "connecting")]
    Connecting,
    #[serde(rename = "connected")]
    Connected,
    /// Connected, with a mutation or refresh in flight
    #[serde(rename = "refreshing")]
    Refreshing,
}

impl std::fmt::Display for ConnectionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionPhase::Disconnected => write!(f, "disconnected"),
            ConnectionPhase::Connecting => write!(f, "connecting"),
            ConnectionPhase::Connected => write!(f, "connected"),
            ConnectionPhase::Refreshing => write!(f, "refreshing"),
        }
    }
}

/// Snapshot of everything the console renders.
///
/// `is_connected` implies `credentials` is set and `objects`/`bucket_info` come from
/// the last successful listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    pub is_connected: bool,
    #[serde(skip)]
    pub credentials: Option<Credentials>,
    pub objects: Vec<ObjectEntry>,
    pub bucket_info: Option<BucketSummary>,
    /// Advisory: the UI disables mutating controls while set
    pub loading: bool,
    pub error: Option<String>,
    pub phase: ConnectionPhase,
}
