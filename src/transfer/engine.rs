//! Transfer Orchestrator
//!
//! Executes a fund transfer as one atomic unit of work: lock both account
//! rows (in lock-policy order), validate currency and funds, record the
//! transfer and its two entries, then apply both balance deltas. Any failure
//! at any step rolls the whole transaction back; partial writes are never
//! visible.
//!
//! The engine holds no mutable state and performs no retries; a rolled-back
//! attempt leaves nothing behind, so callers may safely re-invoke
//! [`TransferEngine::transfer`] after a transient error
//! (see [`LedgerError::is_retryable`]).

use std::time::Duration;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use sqlx::PgConnection;
use tracing::debug;

use super::ordering::lock_order;
use crate::currency::Currency;
use crate::store::{Account, Entry, LedgerError, LedgerStore, Transfer, queries};

/// A request to move `amount` minor units between two accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from_account_id: i64,
    pub to_account_id: i64,
    /// Magnitude in minor units; must be strictly positive
    pub amount: i64,
    pub currency: Currency,
}

/// Complete post-transfer state: the transfer row, its two entries, and
/// both account snapshots after the balance updates. Callers never need to
/// re-query.
#[derive(Debug, Clone, Serialize)]
pub struct TransferResult {
    pub transfer: Transfer,
    pub from_account: Account,
    pub to_account: Account,
    pub from_entry: Entry,
    pub to_entry: Entry,
}

/// The transfer orchestrator
#[derive(Clone)]
pub struct TransferEngine {
    store: LedgerStore,
}

impl TransferEngine {
    pub fn new(store: LedgerStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// Execute a transfer atomically.
    ///
    /// Fails fast (no store I/O) on self-transfer or a non-positive amount;
    /// every other failure rolls back the enclosing transaction.
    pub async fn transfer(&self, req: TransferRequest) -> Result<TransferResult, LedgerError> {
        Self::validate(&req)?;

        let result = self
            .store
            .execute(move |conn: &mut PgConnection| Self::transfer_tx(conn, req).boxed())
            .await?;

        tracing::info!(
            transfer_id = result.transfer.transfer_id,
            from_account_id = req.from_account_id,
            to_account_id = req.to_account_id,
            amount = req.amount,
            currency = %req.currency,
            "transfer committed"
        );

        Ok(result)
    }

    /// Execute a transfer with a caller-supplied deadline. On expiry the
    /// in-flight transaction is rolled back and the call fails with
    /// [`LedgerError::Cancelled`].
    pub async fn transfer_with_deadline(
        &self,
        req: TransferRequest,
        deadline: Duration,
    ) -> Result<TransferResult, LedgerError> {
        Self::validate(&req)?;

        self.store
            .execute_with_deadline(deadline, move |conn: &mut PgConnection| {
                Self::transfer_tx(conn, req).boxed()
            })
            .await
    }

    /// Preconditions that need no store access
    fn validate(req: &TransferRequest) -> Result<(), LedgerError> {
        if req.from_account_id == req.to_account_id {
            return Err(LedgerError::InvalidTransfer {
                account_id: req.from_account_id,
            });
        }
        if req.amount <= 0 {
            return Err(LedgerError::InvalidAmount { amount: req.amount });
        }
        Ok(())
    }

    /// The unit of work: the ordered read/write sequence inside one
    /// transaction.
    ///
    /// Both the `FOR UPDATE` reads and the balance updates touch the
    /// lower-id account first. The reads are the lock acquisition, so the
    /// policy must govern them too; opposite-direction transfers then chase
    /// the same first lock instead of deadlocking.
    async fn transfer_tx(
        conn: &mut PgConnection,
        req: TransferRequest,
    ) -> Result<TransferResult, LedgerError> {
        let (first_id, second_id) = lock_order(req.from_account_id, req.to_account_id);
        let from_is_first = first_id == req.from_account_id;

        let first = queries::get_account_for_update(&mut *conn, first_id).await?;
        let second = queries::get_account_for_update(&mut *conn, second_id).await?;

        let (from_account, to_account) = if from_is_first {
            (first, second)
        } else {
            (second, first)
        };

        for account in [&from_account, &to_account] {
            if account.currency != req.currency {
                return Err(LedgerError::CurrencyMismatch {
                    account_id: account.account_id,
                    requested: req.currency,
                    held: account.currency,
                });
            }
        }

        // Race-free: the from-account row lock is already held
        if from_account.balance < req.amount {
            return Err(LedgerError::InsufficientFunds {
                account_id: from_account.account_id,
                requested: req.amount,
            });
        }

        let transfer = queries::create_transfer(
            &mut *conn,
            req.from_account_id,
            req.to_account_id,
            req.amount,
        )
        .await?;
        let from_entry = queries::create_entry(&mut *conn, req.from_account_id, -req.amount).await?;
        let to_entry = queries::create_entry(&mut *conn, req.to_account_id, req.amount).await?;

        let (from_account, to_account) = if from_is_first {
            let from =
                queries::add_account_balance(&mut *conn, req.from_account_id, -req.amount).await?;
            let to = queries::add_account_balance(&mut *conn, req.to_account_id, req.amount).await?;
            (from, to)
        } else {
            let to = queries::add_account_balance(&mut *conn, req.to_account_id, req.amount).await?;
            let from =
                queries::add_account_balance(&mut *conn, req.from_account_id, -req.amount).await?;
            (from, to)
        };

        debug!(
            transfer_id = transfer.transfer_id,
            from_balance = from_account.balance,
            to_balance = to_account.balance,
            "transfer recorded, awaiting commit"
        );

        Ok(TransferResult {
            transfer,
            from_account,
            to_account,
            from_entry,
            to_entry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn request(from: i64, to: i64, amount: i64) -> TransferRequest {
        TransferRequest {
            from_account_id: from,
            to_account_id: to,
            amount,
            currency: Currency::Usd,
        }
    }

    #[test]
    fn test_validate_rejects_self_transfer() {
        let result = TransferEngine::validate(&request(7, 7, 100));
        assert!(matches!(
            result,
            Err(LedgerError::InvalidTransfer { account_id: 7 })
        ));
    }

    #[test]
    fn test_validate_rejects_non_positive_amounts() {
        for amount in [0, -1, -500] {
            let result = TransferEngine::validate(&request(1, 2, amount));
            assert!(
                matches!(result, Err(LedgerError::InvalidAmount { amount: a }) if a == amount),
                "amount {} must be rejected",
                amount
            );
        }
    }

    #[test]
    fn test_validate_accepts_positive_amount() {
        assert!(TransferEngine::validate(&request(1, 2, 1)).is_ok());
    }

    #[test]
    fn test_result_serializes_for_transport() {
        let now = Utc::now();
        let result = TransferResult {
            transfer: Transfer {
                transfer_id: 10,
                from_account_id: 1,
                to_account_id: 2,
                amount: 3000,
                created_at: now,
            },
            from_account: Account {
                account_id: 1,
                owner: "alice".into(),
                balance: 7000,
                currency: Currency::Usd,
                created_at: now,
            },
            to_account: Account {
                account_id: 2,
                owner: "bob".into(),
                balance: 8000,
                currency: Currency::Usd,
                created_at: now,
            },
            from_entry: Entry {
                entry_id: 20,
                account_id: 1,
                amount: -3000,
                created_at: now,
            },
            to_entry: Entry {
                entry_id: 21,
                account_id: 2,
                amount: 3000,
                created_at: now,
            },
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["transfer"]["amount"], 3000);
        assert_eq!(json["from_entry"]["amount"], -3000);
        assert_eq!(json["to_account"]["currency"], "USD");
    }
}
