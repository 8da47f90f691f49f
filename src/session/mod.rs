//! Session management module
//!
//! This module keeps the bearer token and the cached user record

pub mod context;
pub mod store;

pub use context::{SessionContext, SessionEvent, InvalidationReason, TokenSlot};
pub use store::{SessionStore, MemoryStore, FileStore};
