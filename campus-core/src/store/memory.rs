//! In-process document store

use super::{
    apply_updates, CreateOutcome, Document, DocumentStore, FieldUpdates, Fields, Result,
    StoreError,
};
use async_trait::async_trait;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tokio::sync::RwLock;

type Collection = HashMap<String, Fields>;

/// Document store held in process memory
///
/// Every mutation runs under a single write lock, which makes each primitive
/// atomic with respect to concurrent callers. Contents are lost on drop.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.collections.read().await;
        let document = collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document {
                id: id.to_string(),
                fields: fields.clone(),
            });
        Ok(document)
    }

    async fn list(&self, collection: &str) -> Result<Vec<Document>> {
        let collections = self.collections.read().await;
        let documents = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document {
                        id: id.clone(),
                        fields: fields.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(documents)
    }

    async fn create_if_absent(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
    ) -> Result<CreateOutcome> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        match docs.entry(id.to_string()) {
            Entry::Occupied(_) => Ok(CreateOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(fields);
                Ok(CreateOutcome::Created)
            }
        }
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        updates: FieldUpdates,
    ) -> Result<()> {
        let mut collections = self.collections.write().await;
        let fields = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::not_found(collection, id))?;
        apply_updates(fields, &updates);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .map(|docs| docs.remove(id).is_some())
            .unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{to_fields, FieldUpdate};
    use serde_json::json;
    use std::sync::Arc;

    fn body(name: &str) -> Fields {
        to_fields(&json!({ "name": name, "domains": [] })).unwrap()
    }

    #[tokio::test]
    async fn test_create_if_absent_only_once() {
        let store = MemoryDocumentStore::new();

        let first = store.create_if_absent("colleges", "c1", body("First")).await.unwrap();
        let second = store.create_if_absent("colleges", "c1", body("Second")).await.unwrap();

        assert_eq!(first, CreateOutcome::Created);
        assert_eq!(second, CreateOutcome::AlreadyExists);

        let doc = store.get("colleges", "c1").await.unwrap().unwrap();
        assert_eq!(doc.fields["name"], json!("First"));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let store = MemoryDocumentStore::new();
        assert!(store.get("colleges", "nope").await.unwrap().is_none());
        assert!(store.list("colleges").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let store = MemoryDocumentStore::new();
        let result = store
            .update_fields(
                "colleges",
                "nope",
                vec![("domains".to_string(), FieldUpdate::ArrayUnion(vec![json!("a.edu")]))],
            )
            .await;
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_concurrent_unions_are_all_kept() {
        let store = Arc::new(MemoryDocumentStore::new());
        store.create_if_absent("colleges", "c1", body("Tint")).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..20 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .update_fields(
                        "colleges",
                        "c1",
                        vec![(
                            "domains".to_string(),
                            FieldUpdate::ArrayUnion(vec![json!(format!("d{}.edu", i))]),
                        )],
                    )
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let doc = store.get("colleges", "c1").await.unwrap().unwrap();
        assert_eq!(doc.fields["domains"].as_array().unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryDocumentStore::new();
        store.create_if_absent("stalls", "s1", body("Dosa")).await.unwrap();

        assert!(store.delete("stalls", "s1").await.unwrap());
        assert!(!store.delete("stalls", "s1").await.unwrap());
        assert!(!store.delete("other", "s1").await.unwrap());
    }
}
