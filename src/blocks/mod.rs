//! Block operations for creating, hashing, and signing Nano blocks.

mod builder;
mod hash;
mod sign;
mod state;

pub use builder::{
    change_block_builder, open_block_builder, receive_block_builder, send_block_builder,
    BlockBuilder,
};
pub use hash::BlockHasher;
pub use sign::BlockSigner;
pub use state::{create_change_block, create_open_block, create_receive_block, create_send_block};
