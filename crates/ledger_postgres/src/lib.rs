//! ledger_postgres: PostgreSQL adapter for the ledger's `RecordStore` port.

pub mod store;

pub use store::PgRecordStore;
