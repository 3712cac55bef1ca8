//! Store contract tests.
//!
//! # Design
//! Every property is written once against `&dyn TodoStore` and run against
//! `MemoryTodoStore`. The same checks run against a live deployment when
//! `TODO_STORE_TEST_MONGO_URL` is set; otherwise those tests return early.
//! A local server without TLS needs `?tls=false` in that URL.

use std::collections::HashSet;

use todo_store::{
    Credentials, MemoryTodoStore, MongoTodoStore, Redacted, StoreConfig, StoreError, TodoDraft,
    TodoItem, TodoStore,
};

/// Full CRUD lifecycle; makes no assumption about pre-existing items.
async fn crud_lifecycle(store: &dyn TodoStore) {
    // Step 1: create.
    let created = store
        .create(TodoDraft::new("buy milk", false, 1))
        .await
        .unwrap();
    assert!(!created.id.is_empty());
    assert_eq!(created.title, "buy milk");
    assert!(!created.completed);
    assert_eq!(created.order, 1);
    let id = created.id.clone();

    // Step 2: read back.
    let fetched = store.read(&id).await.unwrap();
    assert_eq!(fetched, created);

    // Step 3: replace.
    let updated = store
        .update(&id, TodoDraft::new("buy oat milk", true, 5))
        .await
        .unwrap();
    assert_eq!(
        updated,
        TodoItem {
            id: id.clone(),
            title: "buy oat milk".to_string(),
            completed: true,
            order: 5,
        }
    );
    assert_eq!(store.read(&id).await.unwrap(), updated);

    // Step 4: listed.
    let listed = store.search().await.unwrap();
    assert!(listed.iter().any(|t| t == &updated));

    // Step 5: delete, then read fails.
    let deleted = store.delete(&id).await.unwrap();
    assert_eq!(deleted.id, id);
    let err = store.read(&id).await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)), "got {err:?}");

    // Step 6: delete again still succeeds.
    assert_eq!(store.delete(&id).await.unwrap().id, id);
}

async fn ids_are_distinct(store: &dyn TodoStore) {
    let mut seen = HashSet::new();
    for order in 0..20 {
        let item = store
            .create(TodoDraft::new(format!("item {order}"), false, order))
            .await
            .unwrap();
        assert!(!item.id.is_empty());
        assert!(seen.insert(item.id), "duplicate id");
    }
    for id in &seen {
        store.delete(id).await.unwrap();
    }
}

async fn update_missing_id_upserts(store: &dyn TodoStore, id: &str) {
    let result = store
        .update(id, TodoDraft::new("x", true, 2))
        .await
        .unwrap();
    assert_eq!(
        result,
        TodoItem {
            id: id.to_string(),
            title: "x".to_string(),
            completed: true,
            order: 2,
        }
    );
    assert_eq!(store.read(id).await.unwrap(), result);
    store.delete(id).await.unwrap();
}

async fn count_matches_search(store: &dyn TodoStore) {
    store.create(TodoDraft::new("one", false, 1)).await.unwrap();
    store.create(TodoDraft::new("two", true, 2)).await.unwrap();
    let count = store.count().await.unwrap();
    let listed = store.search().await.unwrap();
    assert_eq!(count, listed.len() as u64);
    for item in listed.iter().filter(|t| t.title == "one" || t.title == "two") {
        store.delete(&item.id).await.unwrap();
    }
}

async fn malformed_id_is_not_not_found(store: &dyn TodoStore) {
    let err = store.read("").await.unwrap_err();
    assert!(matches!(err, StoreError::InvalidId(_)), "got {err:?}");
    let err = store.read("0123456789abcdef01234567").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)), "got {err:?}");
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

async fn memory_store() -> MemoryTodoStore {
    let mut store = MemoryTodoStore::new();
    store.init().await.unwrap();
    store
}

#[tokio::test]
async fn memory_crud_lifecycle() {
    crud_lifecycle(&memory_store().await).await;
}

#[tokio::test]
async fn memory_ids_are_distinct() {
    ids_are_distinct(&memory_store().await).await;
}

#[tokio::test]
async fn memory_update_missing_id_upserts() {
    update_missing_id_upserts(&memory_store().await, "abc123").await;
}

#[tokio::test]
async fn memory_count_matches_search() {
    count_matches_search(&memory_store().await).await;
}

#[tokio::test]
async fn memory_malformed_id_is_not_not_found() {
    malformed_id_is_not_not_found(&memory_store().await).await;
}

#[tokio::test]
async fn memory_store_is_shared_across_tasks() {
    let store: std::sync::Arc<dyn TodoStore> = std::sync::Arc::new(memory_store().await);
    let handles: Vec<_> = (0..8)
        .map(|n| {
            let store = store.clone();
            tokio::spawn(async move { store.create(TodoDraft::new("t", false, n)).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(store.count().await.unwrap(), 8);
}

// ---------------------------------------------------------------------------
// Live MongoDB (opt-in)
// ---------------------------------------------------------------------------

async fn mongo_store() -> Option<MongoTodoStore> {
    let url = std::env::var("TODO_STORE_TEST_MONGO_URL").ok()?;
    let credentials = Credentials {
        connection_url: Some(Redacted::new(url)),
        ..Credentials::default()
    };
    let mut store = MongoTodoStore::new(StoreConfig::new(credentials).with_env_overrides());
    store.init().await.unwrap();
    Some(store)
}

#[tokio::test]
async fn mongo_contract() {
    let Some(store) = mongo_store().await else {
        eprintln!("TODO_STORE_TEST_MONGO_URL not set; skipping");
        return;
    };
    crud_lifecycle(&store).await;
    ids_are_distinct(&store).await;
    update_missing_id_upserts(&store, "abc123").await;
    update_missing_id_upserts(&store, "0123456789abcdef01234567").await;
    count_matches_search(&store).await;
    malformed_id_is_not_not_found(&store).await;
    store.close().await;
}
