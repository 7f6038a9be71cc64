use futures_util::future::try_join;
use log::{info, warn};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::state::{ConnectionPhase, SessionState};
use super::store::SessionStore;
use crate::adapter::{
    AdapterResult, BucketSummary, Credentials, FileUpload, ObjectEntry, StorageAdapter,
};
use crate::error::ConnectError;

#[derive(Default)]
struct Inner {
    state: SessionState,
    /// Bumped by connect and disconnect; results of older actions are dropped.
    generation: u64,
    in_flight: usize,
}

impl Inner {
    fn begin(&mut self) -> u64 {
        self.in_flight += 1;
        self.state.loading = true;
        if self.state.is_connected {
            self.state.phase = ConnectionPhase::Refreshing;
        }
        self.generation
    }

    fn finish(&mut self, generation: u64) {
        if generation != self.generation {
            return;
        }
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.in_flight == 0 {
            self.state.loading = false;
            if self.state.is_connected {
                self.state.phase = ConnectionPhase::Connected;
            }
        }
    }

    fn apply_listing(&mut self, objects: Vec<ObjectEntry>, info: BucketSummary) {
        self.state.objects = objects;
        self.state.bucket_info = Some(info);
    }
}

/// Turns UI actions into adapter calls and keeps [`SessionState`] consistent.
///
/// Every action records its own failure in `SessionState::error` instead of
/// returning it. Mutations that succeed are followed by a full refresh; failed
/// ones leave the listing as it was.
pub struct SessionController {
    adapter: StorageAdapter,
    store: Arc<dyn SessionStore>,
    inner: Mutex<Inner>,
}

impl SessionController {
    pub fn new(adapter: StorageAdapter, store: Arc<dyn SessionStore>) -> Self {
        Self {
            adapter,
            store,
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn adapter(&self) -> &StorageAdapter {
        &self.adapter
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> SessionState {
        self.lock().state.clone()
    }

    pub fn objects(&self) -> Vec<ObjectEntry> {
        self.lock().state.objects.clone()
    }

    pub fn bucket_info(&self) -> Option<BucketSummary> {
        self.lock().state.bucket_info.clone()
    }

    pub fn loading(&self) -> bool {
        self.lock().state.loading
    }

    pub fn error(&self) -> Option<String> {
        self.lock().state.error.clone()
    }

    pub fn is_connected(&self) -> bool {
        self.lock().state.is_connected
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.lock().state.phase
    }

    pub fn clear_error(&self) {
        self.lock().state.error = None;
    }

    /// Configure the adapter, verify the bucket, then load listing and summary.
    pub async fn connect(&self, credentials: Credentials) {
        let generation = {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.in_flight = 1;
            inner.state = SessionState {
                loading: true,
                phase: ConnectionPhase::Connecting,
                ..Default::default()
            };
            inner.generation
        };
        info!(
            "session: connecting bucket={} region={}",
            credentials.bucket_name, credentials.region
        );

        self.adapter.configure(credentials.clone());
        let result = self.load_after_check().await;

        let mut inner = self.lock();
        if generation != inner.generation {
            // disconnected or reconnected meanwhile
            return;
        }
        inner.in_flight = 0;
        inner.state.loading = false;

        match result {
            Ok((objects, info)) => {
                info!(
                    "session: connected bucket={} objects={}",
                    info.name, info.object_count
                );
                inner.apply_listing(objects, info);
                inner.state.credentials = Some(credentials.clone());
                inner.state.is_connected = true;
                inner.state.phase = ConnectionPhase::Connected;
                inner.state.error = None;
                drop(inner);
                self.store.save(&credentials);
            }
            Err(err) => {
                let classified = ConnectError::classify(&err);
                warn!("session: connect failed: {} ({})", classified, err);
                inner.state = SessionState {
                    error: Some(classified.to_string()),
                    ..Default::default()
                };
                drop(inner);
                self.adapter.reset();
                self.store.clear();
            }
        }
    }

    async fn load_after_check(&self) -> AdapterResult<(Vec<ObjectEntry>, BucketSummary)> {
        self.adapter.test_connection().await?;
        self.fetch_listing().await
    }

    async fn fetch_listing(&self) -> AdapterResult<(Vec<ObjectEntry>, BucketSummary)> {
        try_join(self.adapter.list_objects(), self.adapter.get_bucket_info()).await
    }

    /// Reconnect with persisted credentials. Returns whether an attempt was made.
    pub async fn restore_session(&self) -> bool {
        if self.is_connected() {
            return false;
        }
        match self.store.load() {
            Some(credentials) => {
                info!("session: restoring bucket={}", credentials.bucket_name);
                self.connect(credentials).await;
                true
            }
            None => false,
        }
    }

    /// Re-fetch listing and summary, replacing both. No-op when not connected.
    pub async fn refresh_objects(&self) {
        if !self.is_connected() {
            return;
        }
        let generation = self.lock().begin();
        let outcome = self.reload(generation).await;
        self.finish(generation, outcome);
    }

    /// Listing refresh inside an action that already counts as in flight.
    async fn reload(&self, generation: u64) -> Result<(), String> {
        if !self.is_connected() {
            return Ok(());
        }
        let (objects, info) = self.fetch_listing().await.map_err(|e| e.to_string())?;

        let mut inner = self.lock();
        if generation == inner.generation && inner.state.is_connected {
            inner.apply_listing(objects, info);
        }
        Ok(())
    }

    fn finish(&self, generation: u64, outcome: Result<(), String>) {
        let mut inner = self.lock();
        if generation == inner.generation {
            inner.state.error = outcome.err();
        }
        inner.finish(generation);
    }

    async fn mutate<F>(&self, action: &str, op: F)
    where
        F: Future<Output = AdapterResult<()>>,
    {
        let generation = self.lock().begin();
        let outcome = match op.await {
            Ok(()) => self.reload(generation).await,
            Err(err) => {
                warn!("session: {} failed: {}", action, err);
                Err(err.to_string())
            }
        };
        self.finish(generation, outcome);
    }

    pub async fn delete_object(&self, key: &str) {
        self.mutate("delete", self.adapter.delete_object(key)).await
    }

    pub async fn upload_file(&self, file: FileUpload, key: &str) {
        self.mutate("upload", self.adapter.upload_file(file, key)).await
    }

    pub async fn create_folder(&self, name: &str) {
        self.mutate("create_folder", self.adapter.create_folder(name)).await
    }

    /// Copy then delete; see [`StorageAdapter::rename_object`] for the non-atomic case.
    pub async fn rename_object(&self, old_key: &str, new_key: &str) {
        self.mutate("rename", self.adapter.rename_object(old_key, new_key)).await
    }

    /// Signed download URL, or `None` with the error recorded.
    pub async fn get_download_url(&self, key: &str) -> Option<String> {
        match self.adapter.get_download_url(key).await {
            Ok(url) => {
                self.lock().state.error = None;
                Some(url)
            }
            Err(err) => {
                warn!("session: download url for {} failed: {}", key, err);
                self.lock().state.error = Some(err.to_string());
                None
            }
        }
    }

    /// Forget the session: state, adapter configuration and persisted credentials.
    pub fn disconnect(&self) {
        {
            let mut inner = self.lock();
            inner.generation += 1;
            inner.in_flight = 0;
            inner.state = SessionState::default();
        }
        self.adapter.reset();
        self.store.clear();
        info!("session: disconnected");
    }
}
