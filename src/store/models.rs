//! Ledger row types
//!
//! `Account` is the root entity; `Entry` and `Transfer` are created together
//! inside a transfer transaction and are never mutated or deleted afterwards.
//! Together they form the append-only audit log.

use crate::currency::Currency;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::Row;
use sqlx::postgres::PgRow;

/// A ledger account holding a balance in one currency
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub account_id: i64,
    pub owner: String,
    /// Balance in minor units; always the sum of all entries posted
    pub balance: i64,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
}

impl<'r> sqlx::FromRow<'r, PgRow> for Account {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let code: String = row.try_get("currency")?;
        let currency = code
            .parse::<Currency>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "currency".into(),
                source: Box::new(e),
            })?;

        Ok(Self {
            account_id: row.try_get("account_id")?,
            owner: row.try_get("owner")?,
            balance: row.try_get("balance")?,
            currency,
            created_at: row.try_get("created_at")?,
        })
    }
}

/// One signed ledger line: positive = credit, negative = debit
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Entry {
    pub entry_id: i64,
    pub account_id: i64,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// A fund movement between two accounts; owns exactly two entries that sum
/// to zero
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Transfer {
    pub transfer_id: i64,
    pub from_account_id: i64,
    pub to_account_id: i64,
    /// Magnitude in minor units, always positive
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_serializes_currency_as_code() {
        let account = Account {
            account_id: 1,
            owner: "alice".to_string(),
            balance: 10_000,
            currency: Currency::Usd,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["currency"], "USD");
        assert_eq!(json["balance"], 10_000);
    }
}
