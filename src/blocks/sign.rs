//! Block signing for Nano state blocks.

use crate::blocks::BlockHasher;
use crate::keys::KeyPair;
use crate::types::{BlockHash, PublicKey, Signature, StateBlock};

/// Block signer for signing and verifying blocks.
pub struct BlockSigner;

impl BlockSigner {
    /// Sign a state block and return the signature.
    ///
    /// The block is first hashed, then the hash is signed with the keypair.
    pub fn sign(block: &StateBlock, keypair: &KeyPair) -> Signature {
        let hash = BlockHasher::hash_state_block(block);
        keypair.sign(&hash)
    }

    /// Sign a block hash directly.
    pub fn sign_hash(hash: &BlockHash, keypair: &KeyPair) -> Signature {
        keypair.sign(hash)
    }

    /// Verify a block's signature.
    ///
    /// Returns true if the signature is valid for the block.
    pub fn verify(block: &StateBlock) -> bool {
        match &block.signature {
            Some(signature) => {
                let hash = BlockHasher::hash_state_block(block);
                KeyPair::verify_with_public_key(block.account.public_key(), &hash, signature)
            }
            None => false,
        }
    }

    /// Verify a signature against a block hash and public key.
    pub fn verify_hash(hash: &BlockHash, public_key: &PublicKey, signature: &Signature) -> bool {
        KeyPair::verify_with_public_key(public_key, hash, signature)
    }
}
