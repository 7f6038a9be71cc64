//! Core of a single-bucket object storage console.
//!
//! [`StorageAdapter`] talks to the bucket through an [`ObjectStore`] backend;
//! [`SessionController`] owns the connection state the views render and turns
//! each UI action into "call the adapter, then re-list".
//!
//! ```no_run
//! use std::sync::Arc;
//! use bucket_console::{
//!     Credentials, FileSessionStore, S3Connector, SessionController, StorageAdapter,
//! };
//!
//! # async fn run() {
//! let adapter = StorageAdapter::new(S3Connector::default());
//! let controller = SessionController::new(adapter, Arc::new(FileSessionStore::open_default()));
//!
//! if !controller.restore_session().await {
//!     controller
//!         .connect(Credentials::new("AKIA...", "secret", "us-east-1", "demo"))
//!         .await;
//! }
//! for object in controller.objects() {
//!     println!("{} {}", object.key, bucket_console::listing::format_size(object.size));
//! }
//! # }
//! ```

pub mod adapter;
pub mod error;
pub mod listing;
pub mod media;
pub mod providers;
pub mod session;

pub use adapter::{BucketSummary, Credentials, FileUpload, ObjectEntry, StorageAdapter};
pub use error::{AdapterError, ConnectError, StoreError};
pub use media::MediaKind;
pub use providers::aws::{ClientOptions, S3Connector};
pub use providers::memory::{MemoryConnector, MemoryStore};
pub use providers::{Connector, ObjectStore};
pub use session::{
    ConnectionPhase, FileSessionStore, MemorySessionStore, SessionController, SessionState,
    SessionStore,
};
