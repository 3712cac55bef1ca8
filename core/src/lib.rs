//! Todo item storage over a MongoDB collection.
//!
//! # Overview
//! `TodoStore` is the whole public contract: `init` once, then `count`,
//! `search`, `create`, `read`, `update` and `delete` against the `todos`
//! collection. `MongoTodoStore` talks to a real deployment over TLS;
//! `MemoryTodoStore` keeps items in a map and is what tests substitute.
//!
//! # Design
//! - The store owns its client. Nothing lives in module-level state, and an
//!   initialized store is shared as `Arc<dyn TodoStore>`.
//! - Callers only ever see `id`. The `_id` key field is renamed on the way
//!   out and stripped on the way in (`document`, `key`).
//! - Driver errors are surfaced as-is inside `StoreError`, classified by the
//!   operation that hit them. Nothing is retried.
//!
//! # Testing
//! `tests/integration.rs` runs the store properties against
//! `MemoryTodoStore` by default. `MongoTodoStore`'s CRUD paths only run there
//! when `TODO_STORE_TEST_MONGO_URL` points at a deployment; without it, only
//! its configuration, TLS and pre-`init` behavior is covered by unit tests.

pub mod config;
pub mod document;
pub mod error;
pub mod key;
pub mod memory;
pub mod mongo;
pub mod store;
pub mod types;

pub use config::{Credentials, Redacted, StoreConfig};
pub use error::{StoreError, StoreResult};
pub use key::TodoKey;
pub use memory::MemoryTodoStore;
pub use mongo::MongoTodoStore;
pub use store::TodoStore;
pub use types::{Deleted, TodoDraft, TodoItem};
