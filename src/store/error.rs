//! Ledger error taxonomy
//!
//! One variant per failure kind the transfer surface can produce, each
//! carrying enough context (account id, requested amount) for a transport
//! layer to pick a status code without re-deriving it.

use crate::currency::Currency;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Self-transfer: source and destination are the same account
    #[error("transfer into the same account: {account_id}")]
    InvalidTransfer { account_id: i64 },

    /// Transfer amount must be strictly positive
    #[error("invalid transfer amount: {amount}")]
    InvalidAmount { amount: i64 },

    #[error("account not found: {account_id}")]
    AccountNotFound { account_id: i64 },

    /// Account is not denominated in the requested currency
    #[error("currency mismatch for account {account_id}: requested {requested}, account holds {held}")]
    CurrencyMismatch {
        account_id: i64,
        requested: Currency,
        held: Currency,
    },

    #[error("insufficient funds on account {account_id}: requested {requested}")]
    InsufficientFunds { account_id: i64, requested: i64 },

    /// Could not open a store transaction (pool exhaustion, lost connection)
    #[error("failed to begin transaction: {0}")]
    Connection(#[source] sqlx::Error),

    /// Commit failed; the store has already discarded the transaction
    #[error("failed to commit transaction: {0}")]
    Commit(#[source] sqlx::Error),

    /// Rollback after a failed unit of work itself failed.
    /// Both errors are surfaced; neither is ever dropped.
    #[error("transaction failed: {source}; rollback also failed: {rollback}")]
    Rollback {
        source: Box<LedgerError>,
        rollback: sqlx::Error,
    },

    /// Operation aborted by the caller-supplied deadline
    #[error("operation cancelled")]
    Cancelled,

    /// Row operation failed inside a transaction
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Invariant violation the store surfaced (e.g. a row that no longer
    /// decodes); not caller-correctable
    #[error("internal error: {0}")]
    Internal(String),
}

/// SQLSTATE codes Postgres raises for retryable lock conflicts
const SERIALIZATION_FAILURE: &str = "40001";
const DEADLOCK_DETECTED: &str = "40P01";
/// Check-constraint violation (balance went negative under the DB backstop)
const CHECK_VIOLATION: &str = "23514";

impl LedgerError {
    /// Whether re-invoking the whole operation with the same arguments may
    /// succeed. A rolled-back attempt leaves no partial state, so retrying a
    /// transient store failure is always safe.
    pub fn is_retryable(&self) -> bool {
        match self {
            LedgerError::Connection(_) | LedgerError::Commit(_) => true,
            LedgerError::Database(e) => is_transient(e),
            LedgerError::Rollback { source, .. } => source.is_retryable(),
            _ => false,
        }
    }

    /// True if `err` is the store's non-negative balance backstop firing
    pub(crate) fn is_balance_check_violation(err: &sqlx::Error) -> bool {
        matches!(
            err,
            sqlx::Error::Database(db) if db.code().as_deref() == Some(CHECK_VIOLATION)
        )
    }
}

fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => matches!(
            db.code().as_deref(),
            Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED)
        ),
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut => true,
        _ => false,
    }
}
