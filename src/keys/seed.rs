//! Seed generation and management.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};
use crate::keys::{derive_keypair, KeyPair};

/// Nano wallet seed (32 bytes).
///
/// The seed is the master secret from which all account keys are derived.
/// It should be kept secret and backed up securely.
///
/// Seeds are automatically zeroed when dropped for security.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; 32]);

impl Seed {
    /// Create a new random seed.
    ///
    /// Uses the system's cryptographically secure random number generator.
    #[cfg(feature = "std")]
    pub fn random() -> Result<Self> {
        let mut bytes = [0u8; 32];
        getrandom::getrandom(&mut bytes).map_err(|_| Error::InvalidSeed)?;
        Ok(Seed(bytes))
    }

    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Seed(bytes)
    }

    /// Get as raw bytes.
    ///
    /// Note: Handle with care - this exposes the secret seed.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Create from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(Error::InvalidSeed);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Seed(arr))
    }

    /// Convert to hex string.
    ///
    /// Note: Handle with care - this exposes the secret seed.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// Derive a keypair at the given index.
    ///
    /// Index 0 is the first account, index 1 is the second, etc.
    pub fn derive(&self, index: u32) -> KeyPair {
        derive_keypair(&self.0, index)
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Seed([REDACTED])")
    }
}

impl PartialEq for Seed {
    fn eq(&self, other: &Self) -> bool {
        // Constant-time comparison
        use subtle::ConstantTimeEq;
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for Seed {}
