//! Mapping between `TodoItem`/`TodoDraft` and BSON documents.
//!
//! # Design
//! Documents written by this crate hold `_id`, `title`, `completed` and
//! `order`. Documents written by someone else may lack fields or carry
//! extras, so decoding defaults the missing ones and ignores the rest.
//! `order` may have been written as a double (JS clients, the shell) and is
//! truncated to an integer.

use mongodb::bson::{self, doc, Bson, Document};
use serde::Deserialize;

use crate::error::StoreResult;
use crate::key::TodoKey;
use crate::types::{TodoDraft, TodoItem};

#[derive(Deserialize)]
struct StoredTodo {
    #[serde(rename = "_id")]
    key: Bson,
    #[serde(default)]
    title: String,
    #[serde(default)]
    completed: bool,
    #[serde(default)]
    order: Bson,
}

fn order_from_bson(value: &Bson) -> i64 {
    match value {
        Bson::Int32(n) => i64::from(*n),
        Bson::Int64(n) => *n,
        Bson::Double(n) if n.is_finite() => *n as i64,
        _ => 0,
    }
}

/// Encode a draft. `TodoDraft` has no key field, so neither does the result.
pub fn draft_to_document(draft: &TodoDraft) -> StoreResult<Document> {
    Ok(bson::to_document(draft)?)
}

/// Decode a stored document, renaming `_id` to `id`.
pub fn document_to_item(document: Document) -> StoreResult<TodoItem> {
    let stored: StoredTodo = bson::from_document(document)?;
    Ok(TodoItem {
        id: TodoKey::from_bson(stored.key).to_string(),
        title: stored.title,
        completed: stored.completed,
        order: order_from_bson(&stored.order),
    })
}

/// Filter selecting the single document with this key.
pub fn key_filter(key: &TodoKey) -> Document {
    doc! { "_id": key.to_bson() }
}
