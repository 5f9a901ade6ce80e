//! Block publication: `receive`, `send`, `representative_set`
//! (SPEC_FULL.md §4.8).
//!
//! Every publish on a given account runs under that account's entry in
//! `locks`, so a second call for the same account blocks until the first
//! has updated the frontier it reads (SPEC_FULL.md §5).

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::blocks::{create_change_block, create_open_block, create_receive_block, create_send_block, BlockHasher};
use crate::constants::Network;
use crate::error::{Error, Result};
use crate::rpc::RpcClient;
use crate::store::{queries, BlockRow};
use crate::types::{Account, BlockHash, Raw, Subtype, Work};
use crate::wallet::WalletStore;
use crate::work::validate::WorkValidator;
use crate::work::SharedWorkClient;

/// Orchestrates signing, work generation, and publication of state
/// blocks for accounts in a [`WalletStore`].
pub struct BlockPipeline {
    wallet_store: Arc<WalletStore>,
    rpc: RpcClient,
    work: SharedWorkClient,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl BlockPipeline {
    /// Build a pipeline over a shared wallet store, node RPC client, and
    /// work client.
    pub fn new(wallet_store: Arc<WalletStore>, rpc: RpcClient, work: SharedWorkClient) -> Self {
        BlockPipeline {
            wallet_store,
            rpc,
            work,
            locks: Mutex::new(HashMap::new()),
        }
    }

    async fn account_lock(&self, address: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(address.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    fn network(&self) -> Network {
        self.wallet_store.network()
    }

    /// Verify caller-supplied work, or generate it via the work client.
    async fn resolve_work(
        &self,
        root: &BlockHash,
        subtype: Subtype,
        supplied: Option<Work>,
    ) -> Result<Work> {
        match supplied {
            Some(work) => {
                if WorkValidator::validate_for_subtype(work, root, subtype, self.network()) {
                    Ok(work)
                } else {
                    Err(Error::WorkFailed)
                }
            }
            None => match subtype {
                Subtype::Receive | Subtype::Open => self
                    .work
                    .generate_receive(root, self.network())
                    .await
                    .map_err(|_| Error::WorkFailed),
                _ => self
                    .work
                    .generate_send(root, self.network())
                    .await
                    .map_err(|_| Error::WorkFailed),
            },
        }
    }

    async fn persist_block(
        &self,
        wallet_id: &str,
        address: &Account,
        subtype: Subtype,
        hash: &BlockHash,
        block_json: &str,
        send_id: Option<&str>,
    ) -> Result<()> {
        queries::insert_block(
            self.wallet_store.store().pool(),
            &BlockRow {
                hash: hash.to_hex(),
                wallet_id: wallet_id.to_string(),
                address: address.as_str().to_string(),
                subtype: subtype.as_str().to_string(),
                block_json: block_json.to_string(),
                send_id: send_id.map(|s| s.to_string()),
            },
        )
        .await
    }

    /// Receive a pending send, opening the account if it has no
    /// frontier yet.
    pub async fn receive(
        &self,
        wallet_id: &str,
        account: &Account,
        source_hash: &BlockHash,
        work: Option<Work>,
    ) -> Result<BlockHash> {
        let lock = self.account_lock(account.as_str()).await;
        let _guard = lock.lock().await;

        let block_info = self.rpc.block_info(source_hash).await?;
        let amount = block_info.amount;

        let account_row = self
            .wallet_store
            .get_account(wallet_id, account)
            .await?
            .ok_or(Error::AccountNotFound)?;
        let keypair = self.wallet_store.account_keypair(wallet_id, &account_row).await?;

        let wallet = self.wallet_store.get_wallet(wallet_id).await?;
        let default_representative = wallet
            .representative
            .as_deref()
            .map(|s| s.parse::<Account>())
            .transpose()?;

        let info = self.rpc.account_info(account).await;
        let block = match info {
            Ok(info) => {
                let work = self
                    .resolve_work(&info.frontier, Subtype::Receive, work)
                    .await?;
                let representative = info.representative.unwrap_or_else(|| account.clone());
                create_receive_block(
                    &keypair,
                    self.network(),
                    info.frontier,
                    representative,
                    info.balance,
                    amount,
                    source_hash,
                    Some(work),
                )
            }
            Err(Error::AccountNotFound) => {
                let root = BlockHash::from_bytes(*keypair.public_key().as_bytes());
                let work = self.resolve_work(&root, Subtype::Open, work).await?;
                let representative = account_row
                    .representative
                    .as_deref()
                    .map(|s| s.parse::<Account>())
                    .transpose()?
                    .or(default_representative)
                    .unwrap_or_else(|| account.clone());
                create_open_block(
                    &keypair,
                    self.network(),
                    representative,
                    amount,
                    source_hash,
                    Some(work),
                )
            }
            Err(other) => return Err(other),
        };

        let hash = BlockHasher::hash_state_block(&block);
        let subtype = block.subtype.expect("create_*_block always sets subtype");
        let block_json = serde_json::to_string(&block).map_err(|_| Error::Parse)?;

        self.rpc.process(block, self.network()).await?;
        self.persist_block(wallet_id, account, subtype, &hash, &block_json, None)
            .await?;

        Ok(hash)
    }

    /// Send `amount` from `source` to `destination`. `id`, when given, is
    /// an idempotency key scoped to the wallet: a repeat call with the
    /// same id returns the previously-published block's hash without
    /// publishing again.
    pub async fn send(
        &self,
        wallet_id: &str,
        source: &Account,
        destination: &Account,
        amount: Raw,
        id: Option<&str>,
        work: Option<Work>,
    ) -> Result<BlockHash> {
        if let Some(send_id) = id {
            if let Some(existing) =
                queries::get_block_by_send_id(self.wallet_store.store().pool(), wallet_id, send_id)
                    .await?
            {
                return BlockHash::from_hex(&existing.hash);
            }
        }

        let lock = self.account_lock(source.as_str()).await;
        let _guard = lock.lock().await;

        // Re-check under the lock: a concurrent call for the same
        // (wallet, id) may have committed between the first check and
        // acquiring the account lock.
        if let Some(send_id) = id {
            if let Some(existing) =
                queries::get_block_by_send_id(self.wallet_store.store().pool(), wallet_id, send_id)
                    .await?
            {
                return BlockHash::from_hex(&existing.hash);
            }
        }

        let account_row = self
            .wallet_store
            .get_account(wallet_id, source)
            .await?
            .ok_or(Error::AccountNotFound)?;
        let keypair = self.wallet_store.account_keypair(wallet_id, &account_row).await?;

        let info = self.rpc.account_info(source).await?;
        if info.balance < amount {
            return Err(Error::InsufficientBalance);
        }

        let work = self.resolve_work(&info.frontier, Subtype::Send, work).await?;
        let representative = info.representative.unwrap_or_else(|| source.clone());

        let block = create_send_block(
            &keypair,
            self.network(),
            info.frontier,
            representative,
            info.balance,
            amount,
            destination,
            Some(work),
        );

        let hash = BlockHasher::hash_state_block(&block);
        let block_json = serde_json::to_string(&block).map_err(|_| Error::Parse)?;

        self.rpc.process(block, self.network()).await?;
        self.persist_block(wallet_id, source, Subtype::Send, &hash, &block_json, id)
            .await?;

        Ok(hash)
    }

    /// Change an account's representative.
    pub async fn representative_set(
        &self,
        wallet_id: &str,
        account: &Account,
        representative: &Account,
        work: Option<Work>,
    ) -> Result<BlockHash> {
        let lock = self.account_lock(account.as_str()).await;
        let _guard = lock.lock().await;

        let account_row = self
            .wallet_store
            .get_account(wallet_id, account)
            .await?
            .ok_or(Error::AccountNotFound)?;
        let keypair = self.wallet_store.account_keypair(wallet_id, &account_row).await?;

        let info = self.rpc.account_info(account).await?;
        let work = self.resolve_work(&info.frontier, Subtype::Change, work).await?;

        let block = create_change_block(
            &keypair,
            self.network(),
            info.frontier,
            representative.clone(),
            info.balance,
            Some(work),
        );

        let hash = BlockHasher::hash_state_block(&block);
        let block_json = serde_json::to_string(&block).map_err(|_| Error::Parse)?;

        self.rpc.process(block, self.network()).await?;
        self.persist_block(wallet_id, account, Subtype::Change, &hash, &block_json, None)
            .await?;

        Ok(hash)
    }
}
