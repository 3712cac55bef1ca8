//! Error types for the todo store.
//!
//! # Design
//! Driver failures are split by the kind of call that produced them
//! (`Connection` during `init`, `Query` for reads, `Write` for mutations) and
//! carry the `mongodb` error itself as their source. `NotFound` and
//! `InvalidId` are separate so an HTTP caller can answer 404 and 400
//! respectively.

use mongodb::bson;
use thiserror::Error;

/// Errors returned by `TodoStore` operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Connecting or verifying the connection failed during `init`.
    #[error("connection failed: {0}")]
    Connection(#[source] mongodb::error::Error),

    /// A read-only operation (`count`, `search`, `read`) failed in the driver.
    #[error("query failed: {0}")]
    Query(#[source] mongodb::error::Error),

    /// A mutating operation (`create`, `update`, `delete`) failed in the driver.
    #[error("write failed: {0}")]
    Write(#[source] mongodb::error::Error),

    /// No document matches the identifier.
    #[error("todo {0} not found")]
    NotFound(String),

    /// The identifier cannot be turned into a document key.
    #[error("invalid todo id {0:?}")]
    InvalidId(String),

    /// An operation ran before `init` completed.
    #[error("store is not initialized")]
    NotInitialized,

    /// Credentials are missing a field needed to build a connection string.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("certificate is not valid base64: {0}")]
    Certificate(#[from] base64::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode document: {0}")]
    Encode(#[from] bson::ser::Error),

    #[error("could not decode document: {0}")]
    Decode(#[from] bson::de::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
