//! Typed repositories over the [`RecordStore`] port.
//!
//! One generic [`Repository`] handles (de)serialization between entity
//! structs and store documents; entity-specific queries live in inherent
//! impls on the concrete aliases.

use std::marker::PhantomData;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;

use crate::models::{Entity, Item, Party, PartyOrder, Record, RecordId};
use crate::ports::{Document, Filter, JsonObject, RecordStore};

pub type ItemRepository = Repository<Item>;
pub type PartyRepository = Repository<Party>;
pub type PartyOrderRepository = Repository<PartyOrder>;

pub struct Repository<T> {
    store: Arc<dyn RecordStore>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    pub async fn create(&self, fields: &T) -> Result<Record<T>> {
        let doc = self.store.insert(T::COLLECTION, to_body(fields)?).await?;
        decode(doc)
    }

    pub async fn get(&self, id: RecordId) -> Result<Option<Record<T>>> {
        self.store
            .find_by_id(T::COLLECTION, id)
            .await?
            .map(decode)
            .transpose()
    }

    /// All records, newest first.
    pub async fn list(&self) -> Result<Vec<Record<T>>> {
        self.find(&Filter::All).await
    }

    pub async fn find(&self, filter: &Filter) -> Result<Vec<Record<T>>> {
        self.store
            .find(T::COLLECTION, filter)
            .await?
            .into_iter()
            .map(decode)
            .collect()
    }

    /// Overwrite every field of an existing record.
    pub async fn update(&self, id: RecordId, fields: &T) -> Result<Option<Record<T>>> {
        self.store
            .replace(T::COLLECTION, id, to_body(fields)?)
            .await?
            .map(decode)
            .transpose()
    }

    pub async fn delete(&self, id: RecordId) -> Result<bool> {
        self.store.delete(T::COLLECTION, id).await
    }
}

impl Repository<Item> {
    pub async fn search_by_name(&self, needle: &str) -> Result<Vec<Record<Item>>> {
        self.find(&Filter::Contains {
            field: "itemName",
            needle: needle.to_string(),
        })
        .await
    }
}

impl Repository<Party> {
    pub async fn search_by_name(&self, needle: &str) -> Result<Vec<Record<Party>>> {
        self.find(&Filter::Contains {
            field: "partyName",
            needle: needle.to_string(),
        })
        .await
    }
}

impl Repository<PartyOrder> {
    pub async fn list_for_party(&self, party_id: RecordId) -> Result<Vec<Record<PartyOrder>>> {
        self.find(&Filter::Equals {
            field: "partyId",
            value: party_id.to_string(),
        })
        .await
    }
}

fn to_body<T: Serialize>(fields: &T) -> Result<JsonObject> {
    match serde_json::to_value(fields)? {
        serde_json::Value::Object(map) => Ok(map),
        other => Err(anyhow!("entity did not serialize to an object: {other}")),
    }
}

fn decode<T: Entity>(doc: Document) -> Result<Record<T>> {
    let fields = serde_json::from_value(serde_json::Value::Object(doc.body))
        .with_context(|| format!("malformed {} document {}", T::COLLECTION.as_str(), doc.id))?;
    Ok(Record {
        id: doc.id,
        fields,
        created_at: doc.created_at,
    })
}
