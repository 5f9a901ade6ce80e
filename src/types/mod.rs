//! Core types for Nano cryptocurrency operations.

mod account;
mod amount;
mod block;
mod signature;
mod work;

pub use account::{Account, PublicKey};
pub use amount::{Amount, Raw};
pub use block::{BlockHash, Link, StateBlock, Subtype};
pub use signature::Signature;
pub use work::Work;
