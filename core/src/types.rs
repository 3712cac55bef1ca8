//! Public item shapes exchanged with callers.
//!
//! # Design
//! `TodoItem` is the only shape that carries an identifier, and that
//! identifier is always called `id`. The database's own `_id` never appears
//! here: `TodoDraft` drops unknown fields (including `id` and `_id`) when it
//! is deserialized, so whatever a caller sends in, only `title`, `completed`
//! and `order` reach the collection.

use serde::{Deserialize, Serialize};

/// A stored todo item as seen by callers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoItem {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub order: i64,
}

/// The id-less body of a todo, used for both create and full replacement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TodoDraft {
    pub title: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub order: i64,
}

impl TodoDraft {
    pub fn new(title: impl Into<String>, completed: bool, order: i64) -> Self {
        Self {
            title: title.into(),
            completed,
            order,
        }
    }

    /// Attach an identifier, producing the caller-facing item.
    pub fn with_id(self, id: impl Into<String>) -> TodoItem {
        TodoItem {
            id: id.into(),
            title: self.title,
            completed: self.completed,
            order: self.order,
        }
    }
}

impl From<TodoItem> for TodoDraft {
    fn from(item: TodoItem) -> Self {
        Self {
            title: item.title,
            completed: item.completed,
            order: item.order,
        }
    }
}

/// Echo returned by `delete`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deleted {
    pub id: String,
}
