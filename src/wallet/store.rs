//! Wallet lifecycle and account derivation (SPEC_FULL.md §4.7).
//!
//! Every mutation that touches more than one table runs inside a single
//! [`crate::store::Store`] transaction so a concurrent caller never
//! observes a half-applied wallet or a duplicate deterministic index.

use std::collections::HashMap;

use tokio::sync::Mutex;
use zeroize::Zeroizing;

use crate::constants::Network;
use crate::crypt::{self, DerivedKey};
use crate::error::{Error, Result};
use crate::keys::{KeyPair, Seed};
use crate::store::{queries, AccountRow, AdhocAccountRow, Store, WalletRow};
use crate::types::Account;

/// Generates and tracks wallets, their deterministic accounts, and their
/// adhoc (imported-key) accounts.
///
/// Holds a process-local cache of derived AES keys for currently-unlocked
/// wallets — never the passphrase itself — lost on restart, exactly
/// like the upstream server's in-process `unlock_wallet` state
/// (SPEC_FULL.md §4.7, §5). Every ciphertext belonging to one wallet
/// (its seed and every adhoc key) shares the salt stamped on the
/// wallet's seed blob, so the single cached key opens all of them.
pub struct WalletStore {
    store: Store,
    network: Network,
    unlocked: Mutex<HashMap<String, DerivedKey>>,
}

impl WalletStore {
    /// Build a wallet store over an already-connected [`Store`].
    pub fn new(store: Store, network: Network) -> Self {
        WalletStore {
            store,
            network,
            unlocked: Mutex::new(HashMap::new()),
        }
    }

    fn random_wallet_id() -> Result<String> {
        let mut bytes = [0u8; 16];
        getrandom::getrandom(&mut bytes).map_err(|_| Error::Persistence(
            "failed to generate wallet id".to_string(),
        ))?;
        Ok(hex::encode(bytes))
    }

    /// Fetch a wallet's raw row regardless of its lock state.
    /// `WalletNotFound` if no wallet has that id.
    pub async fn get_wallet_row(&self, wallet_id: &str) -> Result<WalletRow> {
        queries::get_wallet(self.store.pool(), wallet_id)
            .await?
            .ok_or(Error::WalletNotFound)
    }

    /// Fetch a wallet, failing with [`Error::WalletLocked`] if its seed is
    /// currently encrypted. Most operations that touch key material go
    /// through this rather than [`Self::get_wallet_row`] directly.
    pub async fn get_wallet(&self, wallet_id: &str) -> Result<WalletRow> {
        let row = self.get_wallet_row(wallet_id).await?;
        if row.encrypted {
            return Err(Error::WalletLocked);
        }
        Ok(row)
    }

    /// Recover the 32-byte seed for an unlocked (or never-encrypted)
    /// wallet row.
    async fn seed_bytes(&self, wallet: &WalletRow) -> Result<Zeroizing<[u8; 32]>> {
        let hex_seed = if wallet.encrypted {
            let unlocked = self.unlocked.lock().await;
            let key = unlocked.get(&wallet.id).ok_or(Error::WalletLocked)?.clone();
            drop(unlocked);
            let plaintext = crypt::decrypt_with_key(&wallet.seed, &key)?;
            hex::encode_upper(plaintext.as_slice())
        } else {
            wallet.seed.clone()
        };

        let bytes = hex::decode(&hex_seed).map_err(|_| Error::InvalidSeed)?;
        if bytes.len() != 32 {
            return Err(Error::InvalidSeed);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Zeroizing::new(arr))
    }

    /// Derive the keypair at `index` for an unlocked wallet.
    async fn derive(&self, wallet: &WalletRow, index: u32) -> Result<KeyPair> {
        let seed_bytes = self.seed_bytes(wallet).await?;
        Ok(Seed::from_bytes(*seed_bytes).derive(index))
    }

    /// Create a new wallet, optionally from a caller-supplied 64-hex-char
    /// seed, and derive its first account (index 0). Returns the new
    /// wallet's id.
    pub async fn create(&self, seed_hex: Option<&str>) -> Result<String> {
        let seed = match seed_hex {
            Some(s) => Seed::from_hex(s)?,
            None => Seed::random()?,
        };

        let id = Self::random_wallet_id()?;
        let keypair = seed.derive(0);
        let address = keypair.account(self.network);

        let mut tx = self.store.begin().await?;
        queries::insert_wallet(
            &mut *tx,
            &WalletRow {
                id: id.clone(),
                seed: seed.to_hex(),
                encrypted: false,
                representative: None,
                deterministic_index: 1,
                work: true,
            },
        )
        .await?;
        queries::insert_account(
            &mut *tx,
            &AccountRow {
                wallet_id: id.clone(),
                address: address.as_str().to_string(),
                account_index: Some(0),
                representative: None,
                adhoc: false,
            },
        )
        .await?;
        tx.commit().await.map_err(|e| Error::Persistence(e.to_string()))?;

        Ok(id)
    }

    /// Derive and persist the next deterministic account.
    pub async fn account_create(&self, wallet_id: &str) -> Result<Account> {
        let accounts = self.accounts_create(wallet_id, 1).await?;
        Ok(accounts.into_iter().next().expect("requested exactly one"))
    }

    /// Derive and persist `count` contiguous deterministic accounts.
    pub async fn accounts_create(&self, wallet_id: &str, count: u32) -> Result<Vec<Account>> {
        let wallet = self.get_wallet(wallet_id).await?;
        let seed_bytes = self.seed_bytes(&wallet).await?;
        let seed = Seed::from_bytes(*seed_bytes);

        let mut tx = self.store.begin().await?;
        let start = queries::claim_deterministic_indices(&mut *tx, wallet_id, count as i64).await?;

        let mut accounts = Vec::with_capacity(count as usize);
        for offset in 0..count {
            let index = start as u32 + offset;
            let keypair = seed.derive(index);
            let address = keypair.account(self.network);
            queries::insert_account(
                &mut *tx,
                &AccountRow {
                    wallet_id: wallet_id.to_string(),
                    address: address.as_str().to_string(),
                    account_index: Some(index),
                    representative: None,
                    adhoc: false,
                },
            )
            .await?;
            accounts.push(address);
        }
        tx.commit().await.map_err(|e| Error::Persistence(e.to_string()))?;

        Ok(accounts)
    }

    /// List up to `count` of a wallet's accounts (deterministic and
    /// adhoc).
    pub async fn account_list(&self, wallet_id: &str, count: u32) -> Result<Vec<Account>> {
        self.get_wallet(wallet_id).await?;
        let rows = queries::list_accounts(self.store.pool(), wallet_id, count as i64).await?;
        rows.into_iter()
            .map(|row| row.address.parse::<Account>())
            .collect()
    }

    /// Fetch a single account row, `None` if it doesn't belong to the
    /// wallet.
    pub async fn get_account(&self, wallet_id: &str, address: &Account) -> Result<Option<AccountRow>> {
        queries::get_account(self.store.pool(), wallet_id, address.as_str()).await
    }

    /// Derive the keypair behind an account, deterministic or adhoc.
    pub async fn account_keypair(&self, wallet_id: &str, account: &AccountRow) -> Result<KeyPair> {
        if account.adhoc {
            let adhoc = queries::get_adhoc_account(self.store.pool(), wallet_id, &account.address)
                .await?
                .ok_or(Error::AccountNotFound)?;
            let wallet = self.get_wallet_row(wallet_id).await?;
            let hex_key = if wallet.encrypted {
                let unlocked = self.unlocked.lock().await;
                let key = unlocked.get(wallet_id).ok_or(Error::WalletLocked)?.clone();
                drop(unlocked);
                let plaintext = crypt::decrypt_with_key(&adhoc.private_key, &key)?;
                hex::encode_upper(plaintext.as_slice())
            } else {
                adhoc.private_key
            };
            let sk = crate::keys::SecretKey::from_hex(&hex_key)?;
            Ok(KeyPair::from_secret_key(sk))
        } else {
            let index = account.account_index.ok_or(Error::AccountNotFound)?;
            let wallet = self.get_wallet(wallet_id).await?;
            self.derive(&wallet, index as u32).await
        }
    }

    /// Import an adhoc account from a raw 32-byte private key.
    pub async fn adhoc_account_create(&self, wallet_id: &str, private_key: [u8; 32]) -> Result<Account> {
        let wallet = self.get_wallet(wallet_id).await?;
        let keypair = KeyPair::from_private_key(private_key);
        let address = keypair.account(self.network);

        if self.get_account(wallet_id, &address).await?.is_some() {
            return Err(Error::AccountAlreadyExists);
        }

        let hex_key = hex::encode_upper(private_key);
        let stored_key = if wallet.encrypted {
            let unlocked = self.unlocked.lock().await;
            let key = unlocked.get(wallet_id).ok_or(Error::WalletLocked)?.clone();
            drop(unlocked);
            // Reuse the wallet's own salt so the one cached key keeps
            // opening every blob this wallet owns.
            let salt = crypt::blob_salt(&wallet.seed)?;
            crypt::encrypt_with_key(hex_key.as_bytes(), &key, &salt)?
        } else {
            hex_key
        };

        let mut tx = self.store.begin().await?;
        queries::insert_account(
            &mut *tx,
            &AccountRow {
                wallet_id: wallet_id.to_string(),
                address: address.as_str().to_string(),
                account_index: None,
                representative: None,
                adhoc: true,
            },
        )
        .await?;
        queries::insert_adhoc_account(
            &mut *tx,
            &AdhocAccountRow {
                wallet_id: wallet_id.to_string(),
                address: address.as_str().to_string(),
                private_key: stored_key,
            },
        )
        .await?;
        tx.commit().await.map_err(|e| Error::Persistence(e.to_string()))?;

        Ok(address)
    }

    /// Encrypt (or re-encrypt) a wallet's seed and adhoc keys under
    /// `passphrase`. The single code path for first-encryption and
    /// passphrase-change (SPEC_FULL.md §9 Open Question #3): a fresh
    /// salt is always drawn, so changing the passphrase is just
    /// encrypting again.
    pub async fn encrypt_wallet(&self, wallet_id: &str, passphrase: &str) -> Result<()> {
        let wallet = self.get_wallet_row(wallet_id).await?;

        let seed_hex = if wallet.encrypted {
            let unlocked = self.unlocked.lock().await;
            let current = unlocked.get(wallet_id).ok_or(Error::WalletLocked)?.clone();
            drop(unlocked);
            String::from_utf8(crypt::decrypt_with_key(&wallet.seed, &current)?.to_vec())
                .map_err(|_| Error::DecryptionError)?
        } else {
            wallet.seed.clone()
        };

        let adhoc_rows = queries::list_adhoc_accounts(self.store.pool(), wallet_id).await?;
        let mut plain_adhoc = Vec::with_capacity(adhoc_rows.len());
        for row in &adhoc_rows {
            let plain_hex = if wallet.encrypted {
                let unlocked = self.unlocked.lock().await;
                let current = unlocked.get(wallet_id).ok_or(Error::WalletLocked)?.clone();
                drop(unlocked);
                String::from_utf8(crypt::decrypt_with_key(&row.private_key, &current)?.to_vec())
                    .map_err(|_| Error::DecryptionError)?
            } else {
                row.private_key.clone()
            };
            plain_adhoc.push((row.address.clone(), plain_hex));
        }

        // A fresh salt for this (re-)encryption; every blob this wallet
        // owns is re-stamped with it so one freshly-derived key opens
        // all of them.
        let mut salt = [0u8; crypt::SALT_LEN];
        getrandom::getrandom(&mut salt).map_err(|_| Error::DecryptionError)?;
        let new_key = crypt::key_with_salt(passphrase, &salt);

        let new_seed_ciphertext = crypt::encrypt_with_key(seed_hex.as_bytes(), &new_key, &salt)?;
        let mut re_encrypted = Vec::with_capacity(plain_adhoc.len());
        for (address, plain_hex) in &plain_adhoc {
            re_encrypted.push((
                address.clone(),
                crypt::encrypt_with_key(plain_hex.as_bytes(), &new_key, &salt)?,
            ));
        }

        let mut tx = self.store.begin().await?;
        queries::set_wallet_secret(&mut *tx, wallet_id, &new_seed_ciphertext, true).await?;
        for (address, ciphertext) in &re_encrypted {
            queries::set_adhoc_private_key(&mut *tx, wallet_id, address, ciphertext).await?;
        }
        tx.commit().await.map_err(|e| Error::Persistence(e.to_string()))?;

        self.unlocked.lock().await.insert(wallet_id.to_string(), new_key);

        Ok(())
    }

    /// Decrypt a wallet's seed under `passphrase` and hold the derived
    /// AES key — never the passphrase — in the process-local unlock
    /// cache until `lock` is called. `Error::DecryptionError` on a
    /// wrong passphrase or corrupt blob.
    pub async fn unlock(&self, wallet_id: &str, passphrase: &str) -> Result<()> {
        let wallet = self.get_wallet_row(wallet_id).await?;
        if !wallet.encrypted {
            return Err(Error::WalletNotLocked);
        }
        let key = crypt::key_for_blob(&wallet.seed, passphrase)?;
        // Verify the derived key actually opens the seed before caching it.
        crypt::decrypt_with_key(&wallet.seed, &key)?;
        self.unlocked.lock().await.insert(wallet_id.to_string(), key);
        Ok(())
    }

    /// Check whether `passphrase` currently decrypts the wallet's seed,
    /// without mutating lock state either way.
    pub async fn check_password(&self, wallet_id: &str, passphrase: &str) -> Result<bool> {
        let wallet = self.get_wallet_row(wallet_id).await?;
        if !wallet.encrypted {
            return Err(Error::WalletNotLocked);
        }
        Ok(crypt::decrypt(&wallet.seed, passphrase).is_ok())
    }

    /// Whether a wallet is currently encrypted.
    pub async fn is_locked(&self, wallet_id: &str) -> Result<bool> {
        Ok(self.get_wallet_row(wallet_id).await?.encrypted)
    }

    /// Drop the cached derived key for a wallet, re-locking it. A no-op
    /// at the data level — the seed and adhoc keys on disk are already
    /// ciphertext — this only forgets the process-local key.
    pub async fn lock(&self, wallet_id: &str) {
        self.unlocked.lock().await.remove(wallet_id);
    }

    /// Set a wallet's default representative.
    pub async fn set_representative(&self, wallet_id: &str, representative: &Account) -> Result<()> {
        self.get_wallet(wallet_id).await?;
        queries::set_wallet_representative(self.store.pool(), wallet_id, representative.as_str())
            .await
    }

    /// Set every account's representative override, for
    /// `wallet_representative_set`'s `update_existing_accounts` flag.
    /// Does not itself publish change blocks; callers needing that pair
    /// this with [`crate::wallet::BlockPipeline::representative_set`]
    /// per differing account.
    pub async fn bulk_representative_update(&self, wallet_id: &str, representative: &Account) -> Result<Vec<AccountRow>> {
        self.get_wallet(wallet_id).await?;
        let accounts = queries::list_all_accounts(self.store.pool(), wallet_id).await?;
        let mut tx = self.store.begin().await?;
        for account in &accounts {
            queries::set_account_representative(
                &mut *tx,
                wallet_id,
                &account.address,
                representative.as_str(),
            )
            .await?;
        }
        tx.commit().await.map_err(|e| Error::Persistence(e.to_string()))?;
        Ok(accounts)
    }

    /// The network this store derives addresses for.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Access to the underlying persistence handle, for the block
    /// pipeline to share the same pool.
    pub fn store(&self) -> &Store {
        &self.store
    }
}
