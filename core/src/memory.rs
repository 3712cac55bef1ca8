//! In-process `TodoStore` for tests and local runs without a database.
//!
//! Keys are normalized exactly as the MongoDB store normalizes them, and new
//! ids are fresh `ObjectId`s, so callers see the same id shapes from both.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::key::TodoKey;
use crate::store::TodoStore;
use crate::types::{Deleted, TodoDraft, TodoItem};

type Db = Arc<RwLock<HashMap<TodoKey, TodoDraft>>>;

/// `TodoStore` backed by a shared `HashMap`. Clones see the same data.
#[derive(Clone, Default)]
pub struct MemoryTodoStore {
    db: Db,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    fn backend_name(&self) -> &'static str {
        "In-memory"
    }

    async fn init(&mut self) -> StoreResult<()> {
        Ok(())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.db.read().await.len() as u64)
    }

    async fn search(&self) -> StoreResult<Vec<TodoItem>> {
        let todos = self.db.read().await;
        Ok(todos
            .iter()
            .map(|(key, draft)| draft.clone().with_id(key.to_string()))
            .collect())
    }

    async fn create(&self, draft: TodoDraft) -> StoreResult<TodoItem> {
        let key = TodoKey::ObjectId(ObjectId::new());
        self.db.write().await.insert(key.clone(), draft.clone());
        Ok(draft.with_id(key.to_string()))
    }

    async fn read(&self, id: &str) -> StoreResult<TodoItem> {
        let key = TodoKey::parse(id)?;
        let todos = self.db.read().await;
        todos
            .get(&key)
            .cloned()
            .map(|draft| draft.with_id(key.to_string()))
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, draft: TodoDraft) -> StoreResult<TodoItem> {
        let key = TodoKey::parse(id)?;
        self.db.write().await.insert(key, draft.clone());
        Ok(draft.with_id(id))
    }

    async fn delete(&self, id: &str) -> StoreResult<Deleted> {
        let key = TodoKey::parse(id)?;
        self.db.write().await.remove(&key);
        Ok(Deleted { id: id.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clones_share_data() {
        let store = MemoryTodoStore::new();
        let other = store.clone();
        let created = store.create(TodoDraft::new("shared", false, 0)).await.unwrap();
        assert_eq!(other.read(&created.id).await.unwrap(), created);
    }

    #[tokio::test]
    async fn uppercase_hex_reads_same_item() {
        let store = MemoryTodoStore::new();
        let created = store.create(TodoDraft::new("case", false, 0)).await.unwrap();
        let fetched = store.read(&created.id.to_uppercase()).await.unwrap();
        assert_eq!(fetched.id, created.id);
    }

    #[tokio::test]
    async fn search_returns_every_item() {
        let store = MemoryTodoStore::new();
        store.create(TodoDraft::new("a", false, 1)).await.unwrap();
        store.update("b", TodoDraft::new("b", true, 2)).await.unwrap();
        let mut titles: Vec<_> = store
            .search()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        titles.sort();
        assert_eq!(titles, vec!["a", "b"]);
    }
}
