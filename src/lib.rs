//! # Pippin
//!
//! A wallet server for the Nano and BANANO cryptocurrency networks. Pippin
//! speaks the reference node's JSON-RPC wallet dialect: it stores wallets
//! (a seed plus derived and adhoc accounts), builds and signs `state`
//! blocks, races proof-of-work generation across peers with a local
//! fallback, and proxies every other action straight to an upstream node.
//!
//! ## Layout
//!
//! - [`keys`] / [`types`] / [`blocks`]: crypto primitives, account/amount/
//!   block types, and block construction+hashing+signing.
//! - [`work`]: proof-of-work validation, local CPU generation, and the
//!   distributed fan-out work client.
//! - [`crypt`]: passphrase-based encryption of secrets at rest.
//! - [`rpc`]: the upstream node's JSON-RPC client.
//! - [`store`]: the persistence adapter (wallets, accounts, blocks).
//! - [`wallet`]: the wallet store and block pipeline built on top of the
//!   above.
//! - [`server`]: the `POST /` wire protocol gateway.
//! - [`config`]: explicit, constructor-injected runtime configuration.

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]

extern crate alloc;

pub mod blocks;
pub mod config;
pub mod constants;
pub mod crypt;
pub mod error;
pub mod keys;
pub mod logging;
pub mod rpc;
pub mod server;
pub mod store;
pub mod types;
pub mod wallet;
pub mod work;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::blocks::{BlockBuilder, BlockHasher};
    pub use crate::config::Config;
    pub use crate::constants::Network;
    pub use crate::error::{Error, Result};
    pub use crate::keys::{KeyPair, SecretKey, Seed};
    pub use crate::rpc::RpcClient;
    pub use crate::types::{
        Account, Amount, BlockHash, PublicKey, Raw, Signature, StateBlock, Subtype, Work,
    };
    pub use crate::wallet::{BlockPipeline, WalletStore};
    pub use crate::work::{WorkClient, WorkThreshold, WorkValidator};
}

pub use error::{Error, Result};
