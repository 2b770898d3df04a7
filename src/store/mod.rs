//! PostgreSQL Ledger Store
//!
//! Durable storage of accounts, entries and transfers, exposed as
//! single-row primitives plus a begin/commit/rollback transactional
//! boundary.
//!
//! Layering:
//! - [`db`] - connection pool management
//! - [`models`] - row types
//! - [`queries`] - row primitives, usable on the pool or inside a transaction
//! - [`executor`] - the transaction executor ([`LedgerStore`])
//! - [`schema`] - DDL bootstrap for tests and local setups

pub mod db;
pub mod error;
pub mod executor;
pub mod models;
pub mod queries;
pub mod schema;

pub use db::Database;
pub use error::LedgerError;
pub use executor::LedgerStore;
pub use models::{Account, Entry, Transfer};
