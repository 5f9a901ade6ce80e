//! Row types for the persistence adapter's five tables (SPEC_FULL.md §3).

use sqlx::FromRow;

/// A `wallets` row.
#[derive(Debug, Clone, FromRow)]
pub struct WalletRow {
    /// Opaque 128-bit wallet id, rendered as 32 lowercase hex characters.
    pub id: String,
    /// The seed, plaintext hex when `encrypted` is false, the
    /// [`crate::crypt`] ciphertext blob otherwise.
    pub seed: String,
    /// Whether `seed` (and every row in `adhoc_accounts`) is ciphertext.
    pub encrypted: bool,
    /// Default representative address for accounts with no per-account
    /// override.
    pub representative: Option<String>,
    /// One past the highest deterministic account index created so far.
    pub deterministic_index: i64,
    /// Whether `receive` should attempt proof-of-work for this wallet.
    pub work: bool,
}

/// An `accounts` row.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    /// Owning wallet id.
    pub wallet_id: String,
    /// The account's address string.
    pub address: String,
    /// Deterministic derivation index; `None` for adhoc accounts.
    pub account_index: Option<i64>,
    /// Per-account representative override.
    pub representative: Option<String>,
    /// Whether this account is adhoc (own stored key) rather than
    /// deterministic.
    pub adhoc: bool,
}

/// An `adhoc_accounts` row: the stored private key for an adhoc account.
#[derive(Debug, Clone, FromRow)]
pub struct AdhocAccountRow {
    /// Owning wallet id.
    pub wallet_id: String,
    /// The account's address string.
    pub address: String,
    /// Private key, plaintext hex when the wallet is unencrypted, the
    /// [`crate::crypt`] ciphertext blob otherwise.
    pub private_key: String,
}

/// A `blocks` row: a record of every state block this server has created.
#[derive(Debug, Clone, FromRow)]
pub struct BlockRow {
    /// The block's hash, hex-encoded.
    pub hash: String,
    /// Owning wallet id.
    pub wallet_id: String,
    /// The account the block belongs to.
    pub address: String,
    /// `"send"` | `"receive"` | `"open"` | `"change"`.
    pub subtype: String,
    /// The full serialized state block.
    pub block_json: String,
    /// Client-supplied idempotency key, present only for `send` blocks
    /// created with one.
    pub send_id: Option<String>,
}
