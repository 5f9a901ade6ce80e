//! Persisted multi-account wallets and the block pipeline built on top
//! of them.
//!
//! [`WalletStore`] holds every wallet and account backed by the
//! database; [`BlockPipeline`] composes it with the RPC client and work
//! client to publish signed blocks.

mod pipeline;
mod store;

pub use pipeline::BlockPipeline;
pub use store::WalletStore;
