//! Typed request bodies and their validation schemas.
//!
//! Every field is optional at the deserialization layer so that missing
//! fields surface as field-level validation errors rather than decode
//! failures.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{FieldError, FieldLocation, LedgerError};
use crate::models::{Item, Party, PartyOrder, RecordId};
use crate::validation::{FieldRule, Rule, Schema, Validate};

const ITEM_NAME_MSG: &str = "Enter a valid Item Name";
const PARTY_NAME_MSG: &str = "Enter a valid Party Name";
const MOBILE_NO_MSG: &str = "Enter a valid Mobile Number";
const NUMBER_MSG: &str = "Enter a valid number";

const ITEM_NAME_MIN: FieldRule = FieldRule {
    param: "itemName",
    rule: Rule::MinLen(3),
    msg: ITEM_NAME_MSG,
};

const ITEM_NAME_PRESENT: FieldRule = FieldRule {
    param: "itemName",
    rule: Rule::Present,
    msg: ITEM_NAME_MSG,
};

const PARTY_RULES: &[FieldRule] = &[
    FieldRule {
        param: "partyName",
        rule: Rule::MinLen(3),
        msg: PARTY_NAME_MSG,
    },
    FieldRule {
        param: "mobileNo",
        rule: Rule::Digits { min: 9 },
        msg: MOBILE_NO_MSG,
    },
];

fn text(v: &Option<String>) -> Option<Value> {
    v.clone().map(Value::String)
}

/// Numeric body field sent either as a JSON number or as numeric text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(f64),
    Text(String),
}

impl Numeric {
    fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => Value::from(*n),
            Self::Text(s) => Value::String(s.clone()),
        }
    }
}

/// Collects the numeric fields of a request, recording every field that
/// does not hold a number. Absent fields and blank text read as zero.
#[derive(Default)]
struct Numbers {
    errors: Vec<FieldError>,
}

impl Numbers {
    fn read(&mut self, param: &str, raw: Option<Numeric>) -> f64 {
        let parsed = match &raw {
            None => Some(0.0),
            Some(Numeric::Number(n)) => Some(*n),
            Some(Numeric::Text(s)) if s.trim().is_empty() => Some(0.0),
            Some(Numeric::Text(s)) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        };
        parsed.unwrap_or_else(|| {
            self.errors.push(FieldError {
                value: raw.as_ref().map(Numeric::to_value),
                msg: NUMBER_MSG.to_string(),
                param: param.to_string(),
                location: FieldLocation::Body,
            });
            0.0
        })
    }

    fn finish<T>(self, value: T) -> Result<T, LedgerError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(LedgerError::Validation(self.errors))
        }
    }
}

// ── Items ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub item_name: Option<String>,
    pub selling_price: Option<Numeric>,
    pub quantity: Option<Numeric>,
}

impl Validate for NewItem {
    type Output = Item;

    const SCHEMA: Schema = Schema::body(&[ITEM_NAME_MIN]);

    fn field(&self, param: &str) -> Option<Value> {
        match param {
            "itemName" => text(&self.item_name),
            _ => None,
        }
    }

    fn build(self) -> Result<Item, LedgerError> {
        let mut numbers = Numbers::default();
        let item = Item {
            item_name: self.item_name.unwrap_or_default().trim().to_string(),
            selling_price: numbers.read("sellingPrice", self.selling_price),
            quantity: numbers.read("quantity", self.quantity),
        };
        numbers.finish(item)
    }
}

/// Full overwrite of an item. The name must be present but its length is
/// not re-checked on this path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    pub item_name: Option<String>,
    pub selling_price: Option<Numeric>,
    pub quantity: Option<Numeric>,
}

impl Validate for ItemUpdate {
    type Output = Item;

    const SCHEMA: Schema = Schema::body(&[ITEM_NAME_PRESENT]);

    fn field(&self, param: &str) -> Option<Value> {
        match param {
            "itemName" => text(&self.item_name),
            _ => None,
        }
    }

    fn build(self) -> Result<Item, LedgerError> {
        let mut numbers = Numbers::default();
        let item = Item {
            item_name: self.item_name.unwrap_or_default().trim().to_string(),
            selling_price: numbers.read("sellingPrice", self.selling_price),
            quantity: numbers.read("quantity", self.quantity),
        };
        numbers.finish(item)
    }
}

// ── Parties ───────────────────────────────────────────────────

/// Mobile numbers arrive either as JSON numbers or digit strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MobileNo {
    Number(u64),
    Text(String),
}

impl MobileNo {
    fn to_value(&self) -> Value {
        match self {
            Self::Number(n) => Value::from(*n),
            Self::Text(s) => Value::String(s.clone()),
        }
    }

    /// Coerce to the stored numeric form.
    fn to_number(&self) -> Result<u64, LedgerError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(s) => s.trim().parse().map_err(|_| {
                LedgerError::Validation(vec![FieldError {
                    value: Some(self.to_value()),
                    msg: MOBILE_NO_MSG.to_string(),
                    param: "mobileNo".to_string(),
                    location: FieldLocation::Body,
                }])
            }),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyInput {
    pub party_name: Option<String>,
    pub mobile_no: Option<MobileNo>,
}

/// Same rules apply on add and update.
pub type NewParty = PartyInput;
pub type PartyUpdate = PartyInput;

impl Validate for PartyInput {
    type Output = Party;

    const SCHEMA: Schema = Schema::body(PARTY_RULES);

    fn field(&self, param: &str) -> Option<Value> {
        match param {
            "partyName" => text(&self.party_name),
            "mobileNo" => self.mobile_no.as_ref().map(MobileNo::to_value),
            _ => None,
        }
    }

    fn build(self) -> Result<Party, LedgerError> {
        let mobile_no = match &self.mobile_no {
            Some(m) => m.to_number()?,
            None => 0,
        };
        Ok(Party {
            party_name: self.party_name.unwrap_or_default(),
            mobile_no,
        })
    }
}

// ── Party orders ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPartyOrder {
    pub party_id: Option<String>,
    pub item_name: Option<String>,
    pub quantity: Option<Numeric>,
    pub amount: Option<Numeric>,
}

impl Validate for NewPartyOrder {
    type Output = PartyOrder;

    // partyId is neither required nor checked against the parties.
    const SCHEMA: Schema = Schema::body(&[ITEM_NAME_MIN]);

    fn field(&self, param: &str) -> Option<Value> {
        match param {
            "partyId" => text(&self.party_id),
            "itemName" => text(&self.item_name),
            _ => None,
        }
    }

    fn build(self) -> Result<PartyOrder, LedgerError> {
        let raw = self.party_id.unwrap_or_default();
        // Canonical UUID text so per-party listing finds the order.
        let party_id = RecordId::parse(&raw).map_or(raw, |id| id.to_string());
        let mut numbers = Numbers::default();
        let order = PartyOrder {
            party_id,
            item_name: self.item_name.unwrap_or_default().trim().to_string(),
            quantity: numbers.read("quantity", self.quantity),
            amount: numbers.read("amount", self.amount),
        };
        numbers.finish(order)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyOrderUpdate {
    pub item_name: Option<String>,
    pub quantity: Option<Numeric>,
    pub amount: Option<Numeric>,
}

/// Validated order overwrite; the owning party is kept from the stored
/// record.
#[derive(Debug, Clone, PartialEq)]
pub struct PartyOrderChanges {
    pub item_name: String,
    pub quantity: f64,
    pub amount: f64,
}

impl PartyOrderChanges {
    pub fn apply_to(self, party_id: String) -> PartyOrder {
        PartyOrder {
            party_id,
            item_name: self.item_name,
            quantity: self.quantity,
            amount: self.amount,
        }
    }
}

impl Validate for PartyOrderUpdate {
    type Output = PartyOrderChanges;

    const SCHEMA: Schema = Schema::body(&[ITEM_NAME_PRESENT]);

    fn field(&self, param: &str) -> Option<Value> {
        match param {
            "itemName" => text(&self.item_name),
            _ => None,
        }
    }

    fn build(self) -> Result<PartyOrderChanges, LedgerError> {
        let mut numbers = Numbers::default();
        let changes = PartyOrderChanges {
            item_name: self.item_name.unwrap_or_default().trim().to_string(),
            quantity: numbers.read("quantity", self.quantity),
            amount: numbers.read("amount", self.amount),
        };
        numbers.finish(changes)
    }
}
