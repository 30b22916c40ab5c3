//! Document store abstraction
//!
//! Records live as JSON objects addressed by collection name and document ID.
//! Writers never rewrite array fields wholesale: `ArrayUnion`/`ArrayRemove`
//! are applied by the store itself so concurrent writers do not lose updates.

pub mod memory;
pub mod mysql;

pub use memory::MemoryDocumentStore;
pub use mysql::MySqlDocumentStore;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Body of a document: top-level field name to JSON value
pub type Fields = Map<String, Value>;

/// Store-level result type
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors raised by document store backends
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        StoreError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

/// A stored document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

/// Result of a conditional create
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// A single field mutation
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    /// Overwrite the field
    Set(Value),
    /// Append each value not already present
    ArrayUnion(Vec<Value>),
    /// Drop every element equal to one of the values
    ArrayRemove(Vec<Value>),
}

impl FieldUpdate {
    /// Compute the new value of a field from its current value
    pub fn apply(&self, current: Option<Value>) -> Value {
        match self {
            FieldUpdate::Set(value) => value.clone(),
            FieldUpdate::ArrayUnion(values) => {
                let mut items = match current {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                };
                for value in values {
                    if !items.contains(value) {
                        items.push(value.clone());
                    }
                }
                Value::Array(items)
            }
            FieldUpdate::ArrayRemove(values) => {
                let mut items = match current {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                };
                items.retain(|item| !values.contains(item));
                Value::Array(items)
            }
        }
    }
}

/// Ordered list of field mutations applied together
pub type FieldUpdates = Vec<(String, FieldUpdate)>;

/// Apply updates to a document body in order
pub fn apply_updates(fields: &mut Fields, updates: &[(String, FieldUpdate)]) {
    for (name, update) in updates {
        let current = fields.remove(name);
        fields.insert(name.clone(), update.apply(current));
    }
}

/// Serialize a record body into document fields
pub fn to_fields<T: Serialize>(value: &T) -> Result<Fields> {
    match serde_json::to_value(value)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(StoreError::Serialization(<serde_json::Error as serde::ser::Error>::custom(
            "document body must be a JSON object",
        ))),
    }
}

/// Deserialize document fields into a record body
pub fn from_fields<T: DeserializeOwned>(fields: Fields) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(fields))?)
}

/// Document store contract
///
/// `create_if_absent` and `update_fields` must be atomic per document:
/// two racing creates yield exactly one `Created`, and the updates of one
/// `update_fields` call are never interleaved with another writer's.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    async fn list(&self, collection: &str) -> Result<Vec<Document>>;

    async fn create_if_absent(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<CreateOutcome>;

    /// Fails with `StoreError::NotFound` when the document does not exist
    async fn update_fields(&self, collection: &str, id: &str, updates: FieldUpdates)
        -> Result<()>;

    /// Returns whether a document was removed
    async fn delete(&self, collection: &str, id: &str) -> Result<bool>;
}
