//! RPC client for Nano node communication.
//!
//! Provides an asynchronous client for interacting with Nano nodes via JSON-RPC.
//! Works on both native and WASM platforms.
//!
//! # Example
//!
//! ```no_run
//! use pippin::rpc::RpcClient;
//!
//! # async fn example() -> pippin::error::Result<()> {
//! let client = RpcClient::new("http://localhost:7076");
//! let account = "nano_1abc...".parse()?;
//! let info = client.account_info(&account).await?;
//! println!("Balance: {}", info.balance);
//! # Ok(())
//! # }
//! ```

mod client;
mod requests;
mod responses;

pub use client::RpcClient;
pub use requests::*;
pub use responses::*;
