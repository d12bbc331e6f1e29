//! ledger_server: REST surface of the inventory ledger.

pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
