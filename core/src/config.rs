//! Store configuration: credentials, connection string, TLS certificate.
//!
//! # Design
//! Credentials arrive either as a JSON object (the shape cloud bindings hand
//! out, with keys such as `connectionUrl` and `MONGO_HOSTS`) or as
//! environment variables of the same names. Secrets are held in `Redacted`
//! so the `Debug` output of a config can be logged as-is.

use std::fmt;
use std::path::{Path, PathBuf};

use base64::Engine;
use serde::{Deserialize, Deserializer};

use crate::error::{StoreError, StoreResult};

/// Database holding the todo collection.
pub const DATABASE_NAME: &str = "todos";

/// Collection holding todo documents.
pub const COLLECTION_NAME: &str = "todos";

/// Replica set named in assembled connection strings.
pub const REPLICA_SET: &str = "replset";

/// Where the CA certificate lands unless configured otherwise.
pub const DEFAULT_CERTIFICATE_PATH: &str = "mongo.crt";

/// Wrapper that prints `***REDACTED***` instead of its contents.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Redacted<T>(T);

impl<T> Redacted<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl<T> fmt::Debug for Redacted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***REDACTED***")
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Redacted<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        T::deserialize(deserializer).map(Self)
    }
}

/// Connection credentials for the document database.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    /// A full connection string; wins over the parts below. Redacted because
    /// it usually embeds a password.
    #[serde(rename = "connectionUrl", default)]
    pub connection_url: Option<Redacted<String>>,

    #[serde(rename = "MONGO_USERNAME", default)]
    pub username: Option<String>,

    #[serde(rename = "MONGO_PASSWORD", default)]
    pub password: Option<Redacted<String>>,

    /// Comma-delimited `host:port` list of replica-set members.
    #[serde(rename = "MONGO_HOSTS", default)]
    pub hosts: Option<String>,

    #[serde(rename = "MONGO_CERTIFICATE_BASE64", default)]
    pub certificate_base64: Option<Redacted<String>>,
}

impl Credentials {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Read credentials from `MONGO_*` environment variables.
    pub fn from_env() -> Self {
        Self {
            connection_url: env_var("MONGO_CONNECTION_URL").map(Redacted::new),
            username: env_var("MONGO_USERNAME"),
            password: env_var("MONGO_PASSWORD").map(Redacted::new),
            hosts: env_var("MONGO_HOSTS"),
            certificate_base64: env_var("MONGO_CERTIFICATE_BASE64").map(Redacted::new),
        }
    }

    /// The URL to hand the driver: `connection_url` verbatim, otherwise one
    /// assembled from username, password and hosts for a replica set.
    pub fn connection_string(&self) -> StoreResult<String> {
        if let Some(url) = &self.connection_url {
            return Ok(url.expose().clone());
        }
        let username = self
            .username
            .as_deref()
            .ok_or_else(|| StoreError::Config("MONGO_USERNAME is not set".to_string()))?;
        let password = self
            .password
            .as_ref()
            .ok_or_else(|| StoreError::Config("MONGO_PASSWORD is not set".to_string()))?;
        let hosts = self
            .hosts
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| StoreError::Config("MONGO_HOSTS is not set".to_string()))?;
        Ok(format!(
            "mongodb://{}:{}@{}/?replicaSet={REPLICA_SET}",
            urlencoding::encode(username),
            urlencoding::encode(password.expose()),
            hosts.trim(),
        ))
    }
}

/// Everything `MongoTodoStore` needs before `init`.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub credentials: Credentials,
    pub certificate_path: PathBuf,
    /// Accept server certificates that fail validation. Off unless asked for.
    pub allow_invalid_certificates: bool,
}

impl StoreConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            certificate_path: PathBuf::from(DEFAULT_CERTIFICATE_PATH),
            allow_invalid_certificates: false,
        }
    }

    /// Credentials plus `MONGO_CERTIFICATE_PATH` and
    /// `MONGO_ALLOW_INVALID_CERTIFICATES` from the environment.
    pub fn from_env() -> Self {
        Self::new(Credentials::from_env()).with_env_overrides()
    }

    /// Apply the TLS-related environment variables on top of `self`.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(path) = env_var("MONGO_CERTIFICATE_PATH") {
            self.certificate_path = PathBuf::from(path);
        }
        if let Some(flag) = env_var("MONGO_ALLOW_INVALID_CERTIFICATES") {
            self.allow_invalid_certificates = parse_flag(&flag);
        }
        self
    }

    pub fn with_certificate_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.certificate_path = path.into();
        self
    }

    pub fn allow_invalid_certificates(mut self, allow: bool) -> Self {
        self.allow_invalid_certificates = allow;
        self
    }

    /// Decode the base64 certificate, if any, and write it to
    /// `certificate_path`. Returns the path written.
    pub async fn materialize_certificate(&self) -> StoreResult<Option<&Path>> {
        let Some(encoded) = &self.credentials.certificate_base64 else {
            return Ok(None);
        };
        let pem = base64::engine::general_purpose::STANDARD.decode(encoded.expose().trim())?;
        tokio::fs::write(&self.certificate_path, pem).await?;
        Ok(Some(self.certificate_path.as_path()))
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
