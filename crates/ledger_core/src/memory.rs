//! In-memory [`RecordStore`] for tests and `memory://` runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::{Collection, RecordId};
use crate::ports::{Document, Filter, JsonObject, RecordStore};

struct Slot {
    seq: u64,
    doc: Document,
}

#[derive(Default)]
pub struct MemoryRecordStore {
    collections: RwLock<HashMap<Collection, HashMap<RecordId, Slot>>>,
    next_seq: AtomicU64,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in a collection.
    pub async fn count(&self, collection: Collection) -> usize {
        self.collections
            .read()
            .await
            .get(&collection)
            .map_or(0, HashMap::len)
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert(&self, collection: Collection, body: JsonObject) -> Result<Document> {
        let doc = Document {
            id: RecordId::new(),
            created_at: Utc::now(),
            body,
        };
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.collections
            .write()
            .await
            .entry(collection)
            .or_default()
            .insert(
                doc.id,
                Slot {
                    seq,
                    doc: doc.clone(),
                },
            );
        Ok(doc)
    }

    async fn find(&self, collection: Collection, filter: &Filter) -> Result<Vec<Document>> {
        let guard = self.collections.read().await;
        let Some(docs) = guard.get(&collection) else {
            return Ok(Vec::new());
        };
        let mut hits: Vec<&Slot> = docs.values().filter(|s| filter.matches(&s.doc.body)).collect();
        // Newest first; insertion order breaks timestamp ties.
        hits.sort_by(|a, b| {
            b.doc
                .created_at
                .cmp(&a.doc.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(hits.into_iter().map(|s| s.doc.clone()).collect())
    }

    async fn find_by_id(&self, collection: Collection, id: RecordId) -> Result<Option<Document>> {
        Ok(self
            .collections
            .read()
            .await
            .get(&collection)
            .and_then(|docs| docs.get(&id))
            .map(|s| s.doc.clone()))
    }

    async fn replace(
        &self,
        collection: Collection,
        id: RecordId,
        body: JsonObject,
    ) -> Result<Option<Document>> {
        let mut guard = self.collections.write().await;
        let Some(slot) = guard.get_mut(&collection).and_then(|docs| docs.get_mut(&id)) else {
            return Ok(None);
        };
        slot.doc.body = body;
        Ok(Some(slot.doc.clone()))
    }

    async fn delete(&self, collection: Collection, id: RecordId) -> Result<bool> {
        Ok(self
            .collections
            .write()
            .await
            .get_mut(&collection)
            .and_then(|docs| docs.remove(&id))
            .is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(v: serde_json::Value) -> JsonObject {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamp() {
        let store = MemoryRecordStore::new();
        let before = Utc::now();
        let doc = store
            .insert(Collection::Items, body(json!({ "itemName": "Widget" })))
            .await
            .unwrap();
        assert!(doc.created_at >= before);
        let found = store.find_by_id(Collection::Items, doc.id).await.unwrap();
        assert_eq!(found, Some(doc));
    }

    #[tokio::test]
    async fn find_returns_newest_first() {
        let store = MemoryRecordStore::new();
        for name in ["first", "second", "third"] {
            store
                .insert(Collection::Items, body(json!({ "itemName": name })))
                .await
                .unwrap();
        }
        let names: Vec<String> = store
            .find(Collection::Items, &Filter::All)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.body["itemName"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = MemoryRecordStore::new();
        let doc = store
            .insert(Collection::Parties, body(json!({ "partyName": "Acme" })))
            .await
            .unwrap();
        assert!(store.find_by_id(Collection::Items, doc.id).await.unwrap().is_none());
        assert!(!store.delete(Collection::PartyOrders, doc.id).await.unwrap());
        assert_eq!(store.count(Collection::Parties).await, 1);
    }

    #[tokio::test]
    async fn replace_keeps_metadata() {
        let store = MemoryRecordStore::new();
        let doc = store
            .insert(Collection::Items, body(json!({ "itemName": "Old" })))
            .await
            .unwrap();
        let replaced = store
            .replace(Collection::Items, doc.id, body(json!({ "itemName": "New" })))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(replaced.id, doc.id);
        assert_eq!(replaced.created_at, doc.created_at);
        assert_eq!(replaced.body["itemName"], "New");
    }

    #[tokio::test]
    async fn replace_and_delete_missing_return_none_false() {
        let store = MemoryRecordStore::new();
        let id = RecordId::new();
        assert!(store
            .replace(Collection::Items, id, JsonObject::new())
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete(Collection::Items, id).await.unwrap());
    }
}
