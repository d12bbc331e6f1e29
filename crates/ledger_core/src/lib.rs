//! ledger_core: data model and operations for the inventory ledger.
//!
//! The crate is storage-agnostic: every operation goes through the
//! [`ports::RecordStore`] trait. `ledger_postgres` provides the production
//! adapter, [`memory::MemoryRecordStore`] backs tests and local runs.

pub mod error;
pub mod memory;
pub mod models;
pub mod ports;
pub mod repository;
pub mod requests;
pub mod service;
pub mod validation;

pub use error::{FieldError, LedgerError};
pub use service::{LedgerService, LedgerServiceImpl};
