//! HTTP handlers, one module per route group.
//!
//! Handlers stay thin: extract, call [`ledger_core::LedgerService`], wrap the
//! result in its response envelope.

pub mod health;
pub mod items;
pub mod parties;
pub mod party_orders;

use serde::Serialize;

/// `{ "message": … }` confirmation returned by delete endpoints.
#[derive(Debug, Serialize)]
pub struct Removed {
    pub message: &'static str,
}
