//! The `TodoStore` contract shared by every backend.

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::{Deleted, TodoDraft, TodoItem};

/// CRUD over one collection of todo items.
///
/// `init` runs once, before anything else, and needs exclusive access. Every
/// other operation takes `&self`, so an initialized store can be shared
/// behind an `Arc` and called concurrently. Identifiers are always the
/// public `id` form; no operation exposes the backend's key field.
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Human-readable label for the backend.
    fn backend_name(&self) -> &'static str;

    /// Establish the session every later operation reuses.
    async fn init(&mut self) -> StoreResult<()>;

    async fn count(&self) -> StoreResult<u64>;

    /// All items, in whatever order the backend returns them.
    async fn search(&self) -> StoreResult<Vec<TodoItem>>;

    /// Insert a new item. The backend assigns the `id`.
    async fn create(&self, draft: TodoDraft) -> StoreResult<TodoItem>;

    async fn read(&self, id: &str) -> StoreResult<TodoItem>;

    /// Replace the item at `id` with `draft`, inserting it if absent.
    async fn update(&self, id: &str, draft: TodoDraft) -> StoreResult<TodoItem>;

    /// Remove the item at `id`. Succeeds whether or not it existed.
    async fn delete(&self, id: &str) -> StoreResult<Deleted>;
}
