//! MongoDB-backed `TodoStore`.
//!
//! # Design
//! `MongoTodoStore::new` only captures configuration. `init` resolves the
//! connection string, writes the CA certificate to disk, builds a TLS client
//! and pings the deployment before binding the `todos` collection. The
//! resulting `Client` pools connections internally, so every operation
//! borrows the same handle and no locking happens here.

use std::path::Path;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, Tls, TlsOptions};
use mongodb::{Client, Collection};
use tracing::{debug, info, warn};

use crate::config::{StoreConfig, COLLECTION_NAME, DATABASE_NAME};
use crate::document::{document_to_item, draft_to_document, key_filter};
use crate::error::{StoreError, StoreResult};
use crate::key::TodoKey;
use crate::store::TodoStore;
use crate::types::{Deleted, TodoDraft, TodoItem};

struct Connection {
    client: Client,
    collection: Collection<Document>,
}

/// `TodoStore` over the `todos.todos` collection.
pub struct MongoTodoStore {
    config: StoreConfig,
    connection: Option<Connection>,
}

impl MongoTodoStore {
    pub fn new(config: StoreConfig) -> Self {
        info!(?config, "configured MongoDB todo store");
        Self {
            config,
            connection: None,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.connection.is_some()
    }

    /// Shut the client down. Outstanding operations finish first.
    pub async fn close(self) {
        if let Some(connection) = self.connection {
            connection.client.shutdown().await;
            info!("MongoDB client shut down");
        }
    }

    fn collection(&self) -> StoreResult<&Collection<Document>> {
        self.connection
            .as_ref()
            .map(|c| &c.collection)
            .ok_or(StoreError::NotInitialized)
    }

    async fn client_options(&self, uri: &str, ca_file: Option<&Path>) -> StoreResult<ClientOptions> {
        let mut options = ClientOptions::parse(uri).await.map_err(StoreError::Connection)?;
        if matches!(options.tls, Some(Tls::Disabled)) {
            warn!("connection string disables TLS; connecting without encryption");
            return Ok(options);
        }
        // Options parsed from the connection string (tlsCAFile, tlsInsecure, ...)
        // stay in force unless configuration overrides them.
        let mut tls = match options.tls.take() {
            Some(Tls::Enabled(tls)) => tls,
            _ => TlsOptions::default(),
        };
        if let Some(path) = ca_file {
            tls.ca_file_path = Some(path.to_path_buf());
        }
        if self.config.allow_invalid_certificates {
            tls.allow_invalid_certificates = Some(true);
        } else if tls.allow_invalid_certificates.is_none() {
            tls.allow_invalid_certificates = Some(false);
        }
        if tls.allow_invalid_certificates == Some(true) {
            warn!("TLS certificate validation is disabled");
        }
        options.tls = Some(Tls::Enabled(tls));
        Ok(options)
    }
}

#[async_trait]
impl TodoStore for MongoTodoStore {
    fn backend_name(&self) -> &'static str {
        "Databases for MongoDB"
    }

    async fn init(&mut self) -> StoreResult<()> {
        let uri = self.config.credentials.connection_string()?;
        let ca_file = self.config.materialize_certificate().await?;
        if let Some(path) = ca_file {
            debug!(path = %path.display(), "wrote CA certificate");
        }
        let options = self.client_options(&uri, ca_file).await?;

        info!("connecting to MongoDB");
        let client = Client::with_options(options).map_err(StoreError::Connection)?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(StoreError::Connection)?;

        let collection = client.database(DATABASE_NAME).collection(COLLECTION_NAME);
        info!(database = DATABASE_NAME, collection = COLLECTION_NAME, "connected to MongoDB");
        self.connection = Some(Connection { client, collection });
        Ok(())
    }

    async fn count(&self) -> StoreResult<u64> {
        let count = self
            .collection()?
            .count_documents(doc! {})
            .await
            .map_err(StoreError::Query)?;
        debug!(count, "counted todos");
        Ok(count)
    }

    async fn search(&self) -> StoreResult<Vec<TodoItem>> {
        let documents: Vec<Document> = self
            .collection()?
            .find(doc! {})
            .await
            .map_err(StoreError::Query)?
            .try_collect()
            .await
            .map_err(StoreError::Query)?;
        debug!(found = documents.len(), "searched todos");
        documents.into_iter().map(document_to_item).collect()
    }

    async fn create(&self, draft: TodoDraft) -> StoreResult<TodoItem> {
        let document = draft_to_document(&draft)?;
        let result = self
            .collection()?
            .insert_one(document)
            .await
            .map_err(StoreError::Write)?;
        let id = TodoKey::from_bson(result.inserted_id).to_string();
        debug!(%id, "created todo");
        Ok(draft.with_id(id))
    }

    async fn read(&self, id: &str) -> StoreResult<TodoItem> {
        let key = TodoKey::parse(id)?;
        let document = self
            .collection()?
            .find_one(key_filter(&key))
            .await
            .map_err(StoreError::Query)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        debug!(%id, "read todo");
        document_to_item(document)
    }

    async fn update(&self, id: &str, draft: TodoDraft) -> StoreResult<TodoItem> {
        let key = TodoKey::parse(id)?;
        let replacement = draft_to_document(&draft)?;
        let result = self
            .collection()?
            .replace_one(key_filter(&key), replacement)
            .upsert(true)
            .await
            .map_err(StoreError::Write)?;
        debug!(
            %id,
            matched = result.matched_count,
            upserted = result.upserted_id.is_some(),
            "updated todo"
        );
        Ok(draft.with_id(id))
    }

    async fn delete(&self, id: &str) -> StoreResult<Deleted> {
        let key = TodoKey::parse(id)?;
        let result = self
            .collection()?
            .delete_one(key_filter(&key))
            .await
            .map_err(StoreError::Write)?;
        debug!(%id, deleted = result.deleted_count, "deleted todo");
        Ok(Deleted { id: id.to_string() })
    }
}
