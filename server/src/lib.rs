//! HTTP front for a `TodoStore`.
//!
//! Each route forwards to exactly one store operation and maps `StoreError`
//! onto a status code. The router holds the store as `Arc<dyn TodoStore>`,
//! so tests hand it a `MemoryTodoStore` and the binary a `MongoTodoStore`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use todo_store::{Deleted, StoreError, TodoDraft, TodoItem, TodoStore};
use tracing::error;

pub type SharedStore = Arc<dyn TodoStore>;

pub fn app(store: SharedStore) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/count", get(count_todos))
        .route("/todos/{id}", get(get_todo).put(update_todo).delete(delete_todo))
        .with_state(store)
}

/// `StoreError` rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = match &self.0 {
            StoreError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            StoreError::InvalidId(_) => (StatusCode::BAD_REQUEST, "invalid_id"),
            StoreError::NotInitialized | StoreError::Connection(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        };
        let message = if status.is_server_error() {
            error!(error = %self.0, "store operation failed");
            "the todo store could not complete the request".to_string()
        } else {
            self.0.to_string()
        };
        (status, Json(ErrorBody { error: kind, message })).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Count {
    pub count: u64,
}

async fn list_todos(State(store): State<SharedStore>) -> Result<Json<Vec<TodoItem>>, ApiError> {
    Ok(Json(store.search().await?))
}

async fn count_todos(State(store): State<SharedStore>) -> Result<Json<Count>, ApiError> {
    Ok(Json(Count {
        count: store.count().await?,
    }))
}

async fn create_todo(
    State(store): State<SharedStore>,
    Json(input): Json<TodoDraft>,
) -> Result<(StatusCode, Json<TodoItem>), ApiError> {
    let todo = store.create(input).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn get_todo(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<TodoItem>, ApiError> {
    Ok(Json(store.read(&id).await?))
}

async fn update_todo(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
    Json(input): Json<TodoDraft>,
) -> Result<Json<TodoItem>, ApiError> {
    Ok(Json(store.update(&id, input).await?))
}

async fn delete_todo(
    State(store): State<SharedStore>,
    Path(id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    Ok(Json(store.delete(&id).await?))
}
