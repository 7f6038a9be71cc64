//! Session module - connection lifecycle on top of the storage adapter
//!
//! - `state`: the state snapshot views render
//! - `store`: credential persistence across restarts
//! - `controller`: the connection state machine and UI actions

mod controller;
mod state;
mod store;

pub use controller::SessionController;
pub use state::{ConnectionPhase, SessionState};
pub use store::{FileSessionStore, MemorySessionStore, PersistedSession, SessionStore};
