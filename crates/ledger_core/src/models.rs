//! Ledger data model: stored entities, the record envelope, and the
//! projections returned by individual endpoints.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use uuid::Uuid;

use crate::error::LedgerError;

// ── Identity ──────────────────────────────────────────────────

/// Store-generated record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub Uuid);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a client-supplied id. Anything that is not a UUID is rejected
    /// before the store is consulted.
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| LedgerError::InvalidId(raw.to_string()))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ── Collections ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Items,
    Parties,
    PartyOrders,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::Parties => "parties",
            Self::PartyOrders => "party_orders",
        }
    }
}

/// A record kind persisted in its own collection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    const COLLECTION: Collection;
    /// Human label used in not-found messages.
    const LABEL: &'static str;
}

/// A persisted entity together with its store-assigned metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<T> {
    pub id: RecordId,
    #[serde(flatten)]
    pub fields: T,
    pub created_at: DateTime<Utc>,
}

// ── Entities ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub item_name: String,
    #[serde(default)]
    pub selling_price: f64,
    #[serde(default)]
    pub quantity: f64,
}

impl Entity for Item {
    const COLLECTION: Collection = Collection::Items;
    const LABEL: &'static str = "Item";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub party_name: String,
    pub mobile_no: u64,
}

impl Entity for Party {
    const COLLECTION: Collection = Collection::Parties;
    const LABEL: &'static str = "Party";
}

/// An order line placed by a party. `party_id` is not checked against the
/// party collection, and deleting a party leaves its orders in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyOrder {
    pub party_id: String,
    pub item_name: String,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub amount: f64,
}

impl Entity for PartyOrder {
    const COLLECTION: Collection = Collection::PartyOrders;
    const LABEL: &'static str = "Order";
}

// ── Projections ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdated {
    pub id: RecordId,
    pub item_name: String,
    pub selling_price: f64,
    pub quantity: f64,
}

impl From<&Record<Item>> for ItemUpdated {
    fn from(r: &Record<Item>) -> Self {
        Self {
            id: r.id,
            item_name: r.fields.item_name.clone(),
            selling_price: r.fields.selling_price,
            quantity: r.fields.quantity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyUpdated {
    pub id: RecordId,
    pub party_name: String,
    pub mobile_no: u64,
}

impl From<&Record<Party>> for PartyUpdated {
    fn from(r: &Record<Party>) -> Self {
        Self {
            id: r.id,
            party_name: r.fields.party_name.clone(),
            mobile_no: r.fields.mobile_no,
        }
    }
}

/// `getPartyInfo` view of a party.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyInfo {
    pub id: RecordId,
    pub party_name: String,
    pub mobile_no: u64,
    pub created_at: DateTime<Utc>,
}

impl From<Record<Party>> for PartyInfo {
    fn from(r: Record<Party>) -> Self {
        Self {
            id: r.id,
            party_name: r.fields.party_name,
            mobile_no: r.fields.mobile_no,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdated {
    pub id: RecordId,
    pub item_name: String,
    pub quantity: f64,
    pub amount: f64,
}

impl From<&Record<PartyOrder>> for OrderUpdated {
    fn from(r: &Record<PartyOrder>) -> Self {
        Self {
            id: r.id,
            item_name: r.fields.item_name.clone(),
            quantity: r.fields.quantity,
            amount: r.fields.amount,
        }
    }
}

/// Per-party order listing entry; omits the party id it was filtered by.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: RecordId,
    pub item_name: String,
    pub quantity: f64,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
}

impl From<Record<PartyOrder>> for OrderSummary {
    fn from(r: Record<PartyOrder>) -> Self {
        Self {
            id: r.id,
            item_name: r.fields.item_name,
            quantity: r.fields.quantity,
            amount: r.fields.amount,
            created_at: r.created_at,
        }
    }
}
