//! Per-entity queries, generic over any `sqlx` executor so callers can run
//! them directly against the pool or inside an open transaction — the
//! wallet store and block pipeline lean on the latter to keep each RPC's
//! mutations atomic (SPEC_FULL.md §4.4).

use sqlx::{Executor, Sqlite};

use crate::error::{Error, Result};
use crate::store::models::{AccountRow, AdhocAccountRow, BlockRow, WalletRow};

fn db_err(e: sqlx::Error) -> Error {
    Error::Persistence(e.to_string())
}

/// Insert a new wallet row.
pub async fn insert_wallet<'e, E>(executor: E, row: &WalletRow) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO wallets (id, seed, encrypted, representative, deterministic_index, work) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(&row.id)
    .bind(&row.seed)
    .bind(row.encrypted)
    .bind(&row.representative)
    .bind(row.deterministic_index)
    .bind(row.work)
    .execute(executor)
    .await
    .map_err(db_err)?;
    Ok(())
}

/// Fetch a wallet by id.
pub async fn get_wallet<'e, E>(executor: E, id: &str) -> Result<Option<WalletRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, WalletRow>(
        "SELECT id, seed, encrypted, representative, deterministic_index, work \
         FROM wallets WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
    .map_err(db_err)
}

/// Overwrite a wallet's seed and `encrypted` flag (lock/unlock/encrypt_wallet).
pub async fn set_wallet_secret<'e, E>(
    executor: E,
    id: &str,
    seed: &str,
    encrypted: bool,
) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE wallets SET seed = ?1, encrypted = ?2 WHERE id = ?3")
        .bind(seed)
        .bind(encrypted)
        .bind(id)
        .execute(executor)
        .await
        .map_err(db_err)?;
    Ok(())
}

/// Set a wallet's default representative.
pub async fn set_wallet_representative<'e, E>(
    executor: E,
    id: &str,
    representative: &str,
) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query("UPDATE wallets SET representative = ?1 WHERE id = ?2")
        .bind(representative)
        .bind(id)
        .execute(executor)
        .await
        .map_err(db_err)?;
    Ok(())
}

/// Atomically reserve `count` contiguous deterministic indices for
/// `wallet_id`, returning the first reserved index. Relies on SQLite's
/// `RETURNING` clause plus the enclosing transaction's row lock so
/// concurrent callers never observe the same starting index.
pub async fn claim_deterministic_indices<'e, E>(
    executor: E,
    wallet_id: &str,
    count: i64,
) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row: (i64,) = sqlx::query_as(
        "UPDATE wallets SET deterministic_index = deterministic_index + ?1 \
         WHERE id = ?2 RETURNING deterministic_index",
    )
    .bind(count)
    .bind(wallet_id)
    .fetch_one(executor)
    .await
    .map_err(db_err)?;

    Ok(row.0 - count)
}

/// Insert an account row.
pub async fn insert_account<'e, E>(executor: E, row: &AccountRow) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO accounts (wallet_id, address, account_index, representative, adhoc) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(&row.wallet_id)
    .bind(&row.address)
    .bind(row.account_index)
    .bind(&row.representative)
    .bind(row.adhoc)
    .execute(executor)
    .await
    .map_err(db_err)?;
    Ok(())
}

/// Fetch a single account by `(wallet_id, address)`.
pub async fn get_account<'e, E>(
    executor: E,
    wallet_id: &str,
    address: &str,
) -> Result<Option<AccountRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, AccountRow>(
        "SELECT wallet_id, address, account_index, representative, adhoc \
         FROM accounts WHERE wallet_id = ?1 AND address = ?2",
    )
    .bind(wallet_id)
    .bind(address)
    .fetch_optional(executor)
    .await
    .map_err(db_err)
}

/// List up to `limit` accounts of a wallet, ordered by insertion.
pub async fn list_accounts<'e, E>(
    executor: E,
    wallet_id: &str,
    limit: i64,
) -> Result<Vec<AccountRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, AccountRow>(
        "SELECT wallet_id, address, account_index, representative, adhoc \
         FROM accounts WHERE wallet_id = ?1 \
         ORDER BY rowid ASC LIMIT ?2",
    )
    .bind(wallet_id)
    .bind(limit)
    .fetch_all(executor)
    .await
    .map_err(db_err)
}

/// List every account of a wallet (used by `bulk_representative_update`).
pub async fn list_all_accounts<'e, E>(executor: E, wallet_id: &str) -> Result<Vec<AccountRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, AccountRow>(
        "SELECT wallet_id, address, account_index, representative, adhoc \
         FROM accounts WHERE wallet_id = ?1 ORDER BY rowid ASC",
    )
    .bind(wallet_id)
    .fetch_all(executor)
    .await
    .map_err(db_err)
}

/// Set an account's per-account representative override.
pub async fn set_account_representative<'e, E>(
    executor: E,
    wallet_id: &str,
    address: &str,
    representative: &str,
) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "UPDATE accounts SET representative = ?1 WHERE wallet_id = ?2 AND address = ?3",
    )
    .bind(representative)
    .bind(wallet_id)
    .bind(address)
    .execute(executor)
    .await
    .map_err(db_err)?;
    Ok(())
}

/// Insert an adhoc account's private-key row.
pub async fn insert_adhoc_account<'e, E>(executor: E, row: &AdhocAccountRow) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO adhoc_accounts (wallet_id, address, private_key) VALUES (?1, ?2, ?3)",
    )
    .bind(&row.wallet_id)
    .bind(&row.address)
    .bind(&row.private_key)
    .execute(executor)
    .await
    .map_err(db_err)?;
    Ok(())
}

/// Fetch the stored private key for an adhoc account.
pub async fn get_adhoc_account<'e, E>(
    executor: E,
    wallet_id: &str,
    address: &str,
) -> Result<Option<AdhocAccountRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, AdhocAccountRow>(
        "SELECT wallet_id, address, private_key FROM adhoc_accounts \
         WHERE wallet_id = ?1 AND address = ?2",
    )
    .bind(wallet_id)
    .bind(address)
    .fetch_optional(executor)
    .await
    .map_err(db_err)
}

/// List every adhoc account of a wallet (used when re-encrypting on
/// `lock`/`encrypt_wallet`).
pub async fn list_adhoc_accounts<'e, E>(
    executor: E,
    wallet_id: &str,
) -> Result<Vec<AdhocAccountRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, AdhocAccountRow>(
        "SELECT wallet_id, address, private_key FROM adhoc_accounts WHERE wallet_id = ?1",
    )
    .bind(wallet_id)
    .fetch_all(executor)
    .await
    .map_err(db_err)
}

/// Overwrite an adhoc account's stored private key (re-encryption).
pub async fn set_adhoc_private_key<'e, E>(
    executor: E,
    wallet_id: &str,
    address: &str,
    private_key: &str,
) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "UPDATE adhoc_accounts SET private_key = ?1 WHERE wallet_id = ?2 AND address = ?3",
    )
    .bind(private_key)
    .bind(wallet_id)
    .bind(address)
    .execute(executor)
    .await
    .map_err(db_err)?;
    Ok(())
}

/// Insert a block row. `send_id`, when present, is unique per wallet.
pub async fn insert_block<'e, E>(executor: E, row: &BlockRow) -> Result<()>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        "INSERT INTO blocks (hash, wallet_id, address, subtype, block_json, send_id) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    )
    .bind(&row.hash)
    .bind(&row.wallet_id)
    .bind(&row.address)
    .bind(&row.subtype)
    .bind(&row.block_json)
    .bind(&row.send_id)
    .execute(executor)
    .await
    .map_err(db_err)?;
    Ok(())
}

/// Fetch the block previously recorded for `(wallet_id, send_id)`, the
/// idempotency lookup `send` consults before building a new block.
pub async fn get_block_by_send_id<'e, E>(
    executor: E,
    wallet_id: &str,
    send_id: &str,
) -> Result<Option<BlockRow>>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, BlockRow>(
        "SELECT hash, wallet_id, address, subtype, block_json, send_id \
         FROM blocks WHERE wallet_id = ?1 AND send_id = ?2",
    )
    .bind(wallet_id)
    .bind(send_id)
    .fetch_optional(executor)
    .await
    .map_err(db_err)
}
