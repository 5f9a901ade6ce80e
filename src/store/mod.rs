//! Persistence adapter: a pooled SQLite connection and the schema backing
//! [`crate::wallet::WalletStore`] and [`crate::wallet::BlockPipeline`]
//! (SPEC_FULL.md §3, §4.4).

pub mod models;
pub mod queries;

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};

use crate::error::{Error, Result};

pub use models::{AccountRow, AdhocAccountRow, BlockRow, WalletRow};

/// A pooled handle to the server's SQLite database.
///
/// Every table is created idempotently on connect, so there is no separate
/// migration step — the same `CREATE TABLE IF NOT EXISTS` runs whether the
/// database file is fresh or already populated.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open (creating if necessary) the database at `database_url` and
    /// ensure its schema is present.
    ///
    /// `database_url` follows `sqlx`'s SQLite URL conventions, e.g.
    /// `sqlite://pippin.db` or `sqlite::memory:`.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| Error::Persistence(e.to_string()))?
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| Error::Persistence(e.to_string()))?;

        let store = Store { pool };
        store.init_schema().await?;
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS wallets (
                id TEXT PRIMARY KEY,
                seed TEXT NOT NULL,
                encrypted BOOLEAN NOT NULL DEFAULT 0,
                representative TEXT,
                deterministic_index INTEGER NOT NULL DEFAULT 0,
                work BOOLEAN NOT NULL DEFAULT 1
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Persistence(e.to_string()))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS accounts (
                wallet_id TEXT NOT NULL,
                address TEXT NOT NULL,
                account_index INTEGER,
                representative TEXT,
                adhoc BOOLEAN NOT NULL DEFAULT 0,
                PRIMARY KEY (wallet_id, address)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Persistence(e.to_string()))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS adhoc_accounts (
                wallet_id TEXT NOT NULL,
                address TEXT NOT NULL,
                private_key TEXT NOT NULL,
                PRIMARY KEY (wallet_id, address)
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Persistence(e.to_string()))?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS blocks (
                hash TEXT PRIMARY KEY,
                wallet_id TEXT NOT NULL,
                address TEXT NOT NULL,
                subtype TEXT NOT NULL,
                block_json TEXT NOT NULL,
                send_id TEXT
            )",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Persistence(e.to_string()))?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS blocks_wallet_send_id
             ON blocks (wallet_id, send_id)
             WHERE send_id IS NOT NULL",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| Error::Persistence(e.to_string()))?;

        Ok(())
    }

    /// The underlying pool, for callers that only need a single statement.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a transaction. Callers run a sequence of [`queries`] calls
    /// against `&mut *tx` and `commit()` once the whole RPC's mutation is
    /// ready to take effect.
    pub async fn begin(&self) -> Result<Transaction<'_, Sqlite>> {
        self.pool
            .begin()
            .await
            .map_err(|e| Error::Persistence(e.to_string()))
    }

    /// Close the pool, waiting for outstanding connections to finish.
    /// Part of the shutdown sequence alongside the RPC and work clients.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
