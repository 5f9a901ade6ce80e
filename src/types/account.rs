//! Account and public key types for Nano/BANANO.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::constants::{Network, BASE32_ALPHABET};
use crate::error::{AccountError, Error, Result};

/// Public key (32 bytes).
///
/// Represents an Ed25519 public key used in the Nano network.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; 32]);

impl PublicKey {
    /// Zero public key (burn address).
    pub const ZERO: PublicKey = PublicKey([0u8; 32]);

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        PublicKey(bytes)
    }

    /// Get as raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode_upper(self.0)
    }

    /// Create from hex string.
    pub fn from_hex(s: &str) -> Result<Self> {
        let bytes = hex::decode(s)?;
        if bytes.len() != 32 {
            return Err(Error::InvalidPublicKey);
        }
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(PublicKey(arr))
    }

    /// Convert to an account address under the given network's prefix.
    pub fn to_account(&self, network: Network) -> Account {
        Account::from_public_key(self, network)
    }

    /// Check if this is the zero/burn key.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self.to_hex())
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; 32]> for PublicKey {
    fn from(bytes: [u8; 32]) -> Self {
        PublicKey(bytes)
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for PublicKey {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        PublicKey::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// A Nano or BANANO account address.
///
/// `<prefix>_<52-char base32 public key><8-char base32 checksum>`. The
/// prefix (`nano_` or `ban_`) is recognized on parse and recorded so
/// that round-tripping a parsed address preserves its network, but a
/// fresh address is always rendered under the network given to
/// [`Account::from_public_key`].
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Account {
    /// The underlying public key.
    public_key: PublicKey,
    /// The network whose prefix this address carries.
    network: Network,
    /// Cached address string.
    address: String,
}

impl Account {
    /// Create an account address from a public key under `network`.
    pub fn from_public_key(public_key: &PublicKey, network: Network) -> Self {
        let address = encode_account(public_key, network);
        Account {
            public_key: *public_key,
            network,
            address,
        }
    }

    /// Parse an account from an address string, recognizing either
    /// network's prefix.
    pub fn from_address_str_checked(s: &str) -> Result<Self> {
        let (public_key, network) = decode_account(s)?;
        Ok(Account {
            public_key,
            network,
            address: s.to_string(),
        })
    }

    /// Get the underlying public key.
    pub const fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The network whose prefix this address was encoded/parsed under.
    pub const fn network(&self) -> Network {
        self.network
    }

    /// Get the address string.
    pub fn as_str(&self) -> &str {
        &self.address
    }

    /// Check if this is the burn address.
    pub fn is_burn(&self) -> bool {
        self.public_key.is_zero()
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Account({})", self.address)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address)
    }
}

impl FromStr for Account {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Account::from_address_str_checked(s)
    }
}

impl Serialize for Account {
    fn serialize<S>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.address)
    }
}

impl<'de> Deserialize<'de> for Account {
    fn deserialize<D>(deserializer: D) -> core::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Account::from_address_str_checked(&s).map_err(serde::de::Error::custom)
    }
}

/// Encode a public key to an account address under `network`'s prefix.
fn encode_account(public_key: &PublicKey, network: Network) -> String {
    use blake2::digest::consts::U5;
    use blake2::{Blake2b, Digest};

    let mut hasher = Blake2b::<U5>::new();
    hasher.update(public_key.as_bytes());
    let mut checksum: [u8; 5] = hasher.finalize().into();
    checksum.reverse();

    let pk_encoded = encode_base32_256(public_key.as_bytes());
    let checksum_encoded = encode_base32_40(&checksum);

    format!(
        "{}{}{}",
        network.address_prefix(),
        pk_encoded,
        checksum_encoded
    )
}

/// Decode an account address, recognizing either network's prefix.
fn decode_account(address: &str) -> Result<(PublicKey, Network)> {
    use blake2::digest::consts::U5;
    use blake2::{Blake2b, Digest};

    let (data, network) = if let Some(s) = address.strip_prefix(Network::Nano.address_prefix()) {
        (s, Network::Nano)
    } else if let Some(s) = address.strip_prefix(Network::Banano.address_prefix()) {
        (s, Network::Banano)
    } else {
        return Err(Error::InvalidAccount(AccountError::InvalidPrefix));
    };

    if data.len() != 60 {
        return Err(Error::InvalidAccount(AccountError::InvalidLength));
    }

    let pk_part = &data[..52];
    let checksum_part = &data[52..];

    let public_key_bytes = decode_base32_256(pk_part)
        .map_err(|_| Error::InvalidAccount(AccountError::InvalidEncoding))?;

    let mut checksum_bytes = decode_base32_40(checksum_part)
        .map_err(|_| Error::InvalidAccount(AccountError::InvalidEncoding))?;
    checksum_bytes.reverse();

    let mut hasher = Blake2b::<U5>::new();
    hasher.update(&public_key_bytes);
    let expected_checksum: [u8; 5] = hasher.finalize().into();

    if checksum_bytes != expected_checksum {
        return Err(Error::InvalidAccount(AccountError::ChecksumMismatch));
    }

    Ok((PublicKey::from_bytes(public_key_bytes), network))
}

/// Encode 256 bits (32 bytes) to 52 base32 characters.
fn encode_base32_256(bytes: &[u8; 32]) -> String {
    let mut result = String::with_capacity(52);

    let mut bits = (bytes[0] >> 7) as u16;
    result.push(BASE32_ALPHABET[bits as usize] as char);

    bits = ((bytes[0] >> 2) & 0x1F) as u16;
    result.push(BASE32_ALPHABET[bits as usize] as char);

    bits = (bytes[0] & 0x03) as u16;
    let mut bit_count: u8 = 2;

    for &byte in &bytes[1..] {
        bits = (bits << 8) | (byte as u16);
        bit_count += 8;

        while bit_count >= 5 {
            bit_count -= 5;
            let idx = ((bits >> bit_count) & 0x1F) as usize;
            result.push(BASE32_ALPHABET[idx] as char);
        }
        bits &= (1 << bit_count) - 1;
    }

    if bit_count > 0 {
        bits <<= 5 - bit_count;
        result.push(BASE32_ALPHABET[(bits & 0x1F) as usize] as char);
    }

    result
}

/// Decode 52 base32 characters to 256 bits (32 bytes).
fn decode_base32_256(s: &str) -> core::result::Result<[u8; 32], ()> {
    if s.len() != 52 {
        return Err(());
    }

    let mut result = [0u8; 32];
    let mut bits: u32 = 0;
    let mut bit_count: u8 = 0;
    let mut byte_idx = 0;

    for (i, c) in s.chars().enumerate() {
        let value = base32_char_value(c)?;

        if i == 0 {
            bits = (value & 0x01) as u32;
            bit_count = 1;
        } else {
            bits = (bits << 5) | (value as u32);
            bit_count += 5;
        }

        while bit_count >= 8 && byte_idx < 32 {
            bit_count -= 8;
            result[byte_idx] = ((bits >> bit_count) & 0xFF) as u8;
            byte_idx += 1;
        }
        bits &= (1 << bit_count) - 1;
    }

    if byte_idx != 32 {
        return Err(());
    }

    Ok(result)
}

/// Encode 40 bits (5 bytes) to 8 base32 characters.
fn encode_base32_40(bytes: &[u8; 5]) -> String {
    let mut result = String::with_capacity(8);

    let combined: u64 = ((bytes[0] as u64) << 32)
        | ((bytes[1] as u64) << 24)
        | ((bytes[2] as u64) << 16)
        | ((bytes[3] as u64) << 8)
        | (bytes[4] as u64);

    for i in (0..8).rev() {
        let idx = ((combined >> (i * 5)) & 0x1F) as usize;
        result.push(BASE32_ALPHABET[idx] as char);
    }

    result
}

/// Decode 8 base32 characters to 40 bits (5 bytes).
fn decode_base32_40(s: &str) -> core::result::Result<[u8; 5], ()> {
    if s.len() != 8 {
        return Err(());
    }

    let mut combined: u64 = 0;

    for c in s.chars() {
        let value = base32_char_value(c)?;
        combined = (combined << 5) | (value as u64);
    }

    Ok([
        ((combined >> 32) & 0xFF) as u8,
        ((combined >> 24) & 0xFF) as u8,
        ((combined >> 16) & 0xFF) as u8,
        ((combined >> 8) & 0xFF) as u8,
        (combined & 0xFF) as u8,
    ])
}

/// Get the value of a base32 character.
fn base32_char_value(c: char) -> core::result::Result<u8, ()> {
    match c {
        '1' => Ok(0),
        '3' => Ok(1),
        '4' => Ok(2),
        '5' => Ok(3),
        '6' => Ok(4),
        '7' => Ok(5),
        '8' => Ok(6),
        '9' => Ok(7),
        'a' | 'A' => Ok(8),
        'b' | 'B' => Ok(9),
        'c' | 'C' => Ok(10),
        'd' | 'D' => Ok(11),
        'e' | 'E' => Ok(12),
        'f' | 'F' => Ok(13),
        'g' | 'G' => Ok(14),
        'h' | 'H' => Ok(15),
        'i' | 'I' => Ok(16),
        'j' | 'J' => Ok(17),
        'k' | 'K' => Ok(18),
        'm' | 'M' => Ok(19),
        'n' | 'N' => Ok(20),
        'o' | 'O' => Ok(21),
        'p' | 'P' => Ok(22),
        'q' | 'Q' => Ok(23),
        'r' | 'R' => Ok(24),
        's' | 'S' => Ok(25),
        't' | 'T' => Ok(26),
        'u' | 'U' => Ok(27),
        'w' | 'W' => Ok(28),
        'x' | 'X' => Ok(29),
        'y' | 'Y' => Ok(30),
        'z' | 'Z' => Ok(31),
        _ => Err(()),
    }
}
