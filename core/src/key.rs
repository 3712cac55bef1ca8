//! Identifier normalization between the public `id` and the `_id` key.

use std::fmt;

use mongodb::bson::{oid::ObjectId, Bson};

use crate::error::{StoreError, StoreResult};

/// A document key parsed from a caller-supplied identifier.
///
/// Hex strings of ObjectId length become `ObjectId` keys; any other non-empty
/// string is kept as a string key so ids chosen by callers on upsert survive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TodoKey {
    ObjectId(ObjectId),
    Text(String),
}

impl TodoKey {
    pub fn parse(id: &str) -> StoreResult<Self> {
        if id.trim().is_empty() {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        match ObjectId::parse_str(id) {
            Ok(oid) => Ok(Self::ObjectId(oid)),
            Err(_) => Ok(Self::Text(id.to_string())),
        }
    }

    /// Recover a key from a stored `_id` value.
    ///
    /// Keys of any other BSON type (numbers, documents) are only rendered as
    /// text; such an id cannot be passed back to `read`, `update` or `delete`
    /// because it parses as a string key. This crate never writes such keys.
    pub fn from_bson(value: Bson) -> Self {
        match value {
            Bson::ObjectId(oid) => Self::ObjectId(oid),
            Bson::String(s) => Self::Text(s),
            other => Self::Text(other.to_string()),
        }
    }

    pub fn to_bson(&self) -> Bson {
        match self {
            Self::ObjectId(oid) => Bson::ObjectId(*oid),
            Self::Text(s) => Bson::String(s.clone()),
        }
    }
}

impl fmt::Display for TodoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ObjectId(oid) => write!(f, "{}", oid.to_hex()),
            Self::Text(s) => f.write_str(s),
        }
    }
}
