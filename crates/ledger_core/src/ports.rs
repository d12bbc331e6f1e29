//! Port traits: the storage boundary of the ledger.
//!
//! The ledger never talks to a database directly. Every read and write goes
//! through [`RecordStore`], so the same operations run against Postgres
//! (`ledger_postgres::PgRecordStore`) or the in-memory store used by tests.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::models::{Collection, RecordId};

/// Field map of a stored document, excluding store-owned metadata.
pub type JsonObject = serde_json::Map<String, serde_json::Value>;

/// A document as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: RecordId,
    pub created_at: DateTime<Utc>,
    pub body: JsonObject,
}

/// Query predicate over a single top-level string field.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    /// Exact match on a string field.
    Equals { field: &'static str, value: String },
    /// Case-insensitive substring match on a string field.
    Contains { field: &'static str, needle: String },
}

impl Filter {
    /// Evaluate the filter against a document body. Adapters that cannot push
    /// the predicate down to the database use this directly.
    pub fn matches(&self, body: &JsonObject) -> bool {
        match self {
            Self::All => true,
            Self::Equals { field, value } => {
                body.get(*field).and_then(|v| v.as_str()) == Some(value.as_str())
            }
            Self::Contains { field, needle } => body
                .get(*field)
                .and_then(|v| v.as_str())
                .map(|s| s.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
        }
    }
}

/// Document persistence. Implementations assign ids and creation
/// timestamps; `find` returns newest documents first.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn insert(&self, collection: Collection, body: JsonObject) -> Result<Document>;
    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>>;
    async fn find_by_id(&self, collection: Collection, id: RecordId) -> Result<Option<Document>>;

    /// Overwrite the body of an existing document, keeping its id and
    /// creation time. Returns `None` if the document does not exist.
    async fn replace(
        &self,
        collection: Collection,
        id: RecordId,
        body: JsonObject,
    ) -> Result<Option<Document>>;

    /// Returns whether a document was removed.
    async fn delete(&self, collection: Collection, id: RecordId) -> Result<bool>;

    /// Release underlying resources. Called once at shutdown.
    async fn close(&self) {}
}
