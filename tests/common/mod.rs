#![allow(dead_code)]

use std::sync::Arc;

use bucket_console::{
    Credentials, MemoryConnector, MemorySessionStore, MemoryStore, SessionController,
    StorageAdapter,
};

pub const BUCKET: &str = "demo";
pub const REGION: &str = "us-east-1";
pub const ACCESS_KEY: &str = "AKIAEXAMPLE";
pub const SECRET_KEY: &str = "wJalrXUtnFEMI/K7MDENG";

pub fn credentials() -> Credentials {
    Credentials::new(ACCESS_KEY, SECRET_KEY, REGION, BUCKET)
}

/// Remote store with the demo bucket and a fixed key pair.
pub fn remote() -> Arc<MemoryStore> {
    let store = MemoryStore::with_credentials(ACCESS_KEY, SECRET_KEY);
    store.create_bucket(BUCKET);
    store
}

pub fn adapter(remote: &Arc<MemoryStore>) -> StorageAdapter {
    StorageAdapter::new(MemoryConnector::new(Arc::clone(remote)))
}

pub struct Harness {
    pub remote: Arc<MemoryStore>,
    pub sessions: Arc<MemorySessionStore>,
    pub controller: SessionController,
}

pub fn harness(remote: Arc<MemoryStore>) -> Harness {
    harness_with_sessions(remote, Arc::new(MemorySessionStore::new()))
}

pub fn harness_with_sessions(
    remote: Arc<MemoryStore>,
    sessions: Arc<MemorySessionStore>,
) -> Harness {
    let controller = SessionController::new(adapter(&remote), sessions.clone());
    Harness {
        remote,
        sessions,
        controller,
    }
}

/// Harness already connected to the demo bucket.
pub async fn connected(remote: Arc<MemoryStore>) -> Harness {
    let h = harness(remote);
    h.controller.connect(credentials()).await;
    assert!(h.controller.is_connected(), "connect failed: {:?}", h.controller.error());
    h
}

pub fn listed_keys(controller: &SessionController) -> Vec<String> {
    controller.objects().into_iter().map(|o| o.key).collect()
}
