//! vaultledger - Double-Entry Ledger Backend
//!
//! A transactional fund-transfer engine over PostgreSQL: accounts hold
//! balances in a fixed currency, transfers move funds between two accounts
//! and record an auditable double-entry trail, atomically and without
//! deadlocking under concurrent load.
//!
//! # Modules
//!
//! - [`config`] - YAML application configuration
//! - [`logging`] - tracing subscriber setup
//! - [`currency`] - supported currency codes
//! - [`money`] - minor-unit amount parsing/formatting
//! - [`store`] - PostgreSQL ledger store (rows, queries, transaction executor)
//! - [`transfer`] - the transfer orchestrator and lock ordering policy

pub mod config;
pub mod currency;
pub mod logging;
pub mod money;
pub mod store;
pub mod transfer;

// Convenient re-exports at crate root
pub use config::{AppConfig, LedgerConfig};
pub use currency::Currency;
pub use logging::init_logging;
pub use store::{Account, Database, Entry, LedgerError, LedgerStore, Transfer};
pub use transfer::{TransferEngine, TransferRequest, TransferResult, lock_order};
