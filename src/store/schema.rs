//! Ledger schema bootstrap
//!
//! DDL for the three ledger tables. Production deployments run their own
//! migrations; this module exists so tests and local setups can start from
//! an empty database.

use sqlx::PgPool;

pub const CREATE_ACCOUNTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS accounts_tb (
    account_id  BIGSERIAL PRIMARY KEY,
    owner       TEXT NOT NULL,
    balance     BIGINT NOT NULL DEFAULT 0 CHECK (balance >= 0),
    currency    TEXT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

pub const CREATE_ENTRIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS entries_tb (
    entry_id    BIGSERIAL PRIMARY KEY,
    account_id  BIGINT NOT NULL REFERENCES accounts_tb (account_id),
    amount      BIGINT NOT NULL,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

pub const CREATE_TRANSFERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS transfers_tb (
    transfer_id      BIGSERIAL PRIMARY KEY,
    from_account_id  BIGINT NOT NULL REFERENCES accounts_tb (account_id),
    to_account_id    BIGINT NOT NULL REFERENCES accounts_tb (account_id),
    amount           BIGINT NOT NULL CHECK (amount > 0),
    created_at       TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CREATE_INDEXES: [&str; 4] = [
    "CREATE INDEX IF NOT EXISTS idx_accounts_owner ON accounts_tb (owner)",
    "CREATE INDEX IF NOT EXISTS idx_entries_account ON entries_tb (account_id)",
    "CREATE INDEX IF NOT EXISTS idx_transfers_from ON transfers_tb (from_account_id)",
    "CREATE INDEX IF NOT EXISTS idx_transfers_to ON transfers_tb (to_account_id)",
];

/// Create the ledger tables and indexes if they do not exist
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Initializing ledger schema...");

    sqlx::query(CREATE_ACCOUNTS_TABLE).execute(pool).await?;
    sqlx::query(CREATE_ENTRIES_TABLE).execute(pool).await?;
    sqlx::query(CREATE_TRANSFERS_TABLE).execute(pool).await?;

    for ddl in CREATE_INDEXES {
        sqlx::query(ddl).execute(pool).await?;
    }

    tracing::info!("Ledger schema initialized");
    Ok(())
}
