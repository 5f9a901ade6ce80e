//! Error types for Pippin.
//!
//! Every internal error is a variant of the single [`Error`] enum — a
//! tagged sum, per the design note in SPEC_FULL.md §9. Mapping to the
//! wire strings of SPEC_FULL.md §7 happens in exactly one place,
//! [`crate::server::wire_message`]; nothing else should match on the
//! string form of an error.

use core::fmt;
use std::string::String;

/// Result type alias for Pippin operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error types that can occur in Pippin operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid seed format or length.
    InvalidSeed,
    /// Invalid private key format or length.
    InvalidPrivateKey,
    /// Invalid public key format or length.
    InvalidPublicKey,
    /// Invalid account address format or checksum.
    InvalidAccount(AccountError),
    /// Invalid block hash format or length.
    InvalidBlockHash,
    /// Invalid block structure or missing fields.
    InvalidBlock(BlockError),
    /// Invalid signature format or verification failed.
    InvalidSignature,
    /// Invalid work value or insufficient difficulty.
    InvalidWork,
    /// Invalid amount value or overflow.
    InvalidAmount(AmountError),
    /// Hex decoding error.
    HexDecode(HexError),
    /// RPC communication error talking to the upstream node or a peer.
    Rpc(RpcError),
    /// Work generation error.
    WorkGeneration(WorkError),

    /// The request body was not valid JSON, or a required field was
    /// missing or of the wrong type.
    Parse,
    /// No wallet exists with the given id.
    WalletNotFound,
    /// The wallet's secrets are encrypted and no key is held for it.
    WalletLocked,
    /// `password_enter`/`password_valid` called against a wallet that was
    /// never encrypted.
    WalletNotLocked,
    /// An adhoc account with that address already exists in the wallet.
    AccountAlreadyExists,
    /// Passphrase-based decryption failed (wrong passphrase or corrupt
    /// ciphertext). Never conflated with "not encrypted".
    DecryptionError,
    /// No account exists with the given address, or it has no frontier.
    AccountNotFound,
    /// No block exists with the given hash, per the upstream node.
    BlockNotFound,
    /// The account's balance is insufficient for the requested send.
    InsufficientBalance,
    /// The work client could not produce valid work for a root.
    WorkFailed,
    /// The upstream node rejected a `process` call.
    ProcessFailed,
    /// The requested RPC action is recognized but deliberately
    /// unimplemented (SPEC_FULL.md §6).
    NotImplemented,
    /// The persistence layer reported an error that does not correspond
    /// to any of the kinds above.
    Persistence(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidSeed => write!(f, "invalid seed: must be 32 bytes"),
            Error::InvalidPrivateKey => write!(f, "invalid private key: must be 32 bytes"),
            Error::InvalidPublicKey => write!(f, "invalid public key: must be 32 bytes"),
            Error::InvalidAccount(e) => write!(f, "invalid account: {}", e),
            Error::InvalidBlockHash => write!(f, "invalid block hash: must be 32 bytes"),
            Error::InvalidBlock(e) => write!(f, "invalid block: {}", e),
            Error::InvalidSignature => write!(f, "invalid signature"),
            Error::InvalidWork => write!(f, "invalid work: insufficient difficulty"),
            Error::InvalidAmount(e) => write!(f, "invalid amount: {}", e),
            Error::HexDecode(e) => write!(f, "hex decode error: {}", e),
            Error::Rpc(e) => write!(f, "RPC error: {}", e),
            Error::WorkGeneration(e) => write!(f, "work generation error: {}", e),
            Error::Parse => write!(f, "unable to parse json"),
            Error::WalletNotFound => write!(f, "wallet not found"),
            Error::WalletLocked => write!(f, "wallet locked"),
            Error::WalletNotLocked => write!(f, "wallet not locked"),
            Error::AccountAlreadyExists => write!(f, "account already exists"),
            Error::DecryptionError => write!(f, "decryption failed"),
            Error::AccountNotFound => write!(f, "account not found"),
            Error::BlockNotFound => write!(f, "block not found"),
            Error::InsufficientBalance => write!(f, "insufficient balance"),
            Error::WorkFailed => write!(f, "failed to generate work"),
            Error::ProcessFailed => write!(f, "rpc process failed"),
            Error::NotImplemented => write!(f, "not implemented"),
            Error::Persistence(msg) => write!(f, "persistence error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidAccount(e) => Some(e),
            Error::InvalidBlock(e) => Some(e),
            Error::InvalidAmount(e) => Some(e),
            Error::HexDecode(e) => Some(e),
            Error::Rpc(e) => Some(e),
            Error::WorkGeneration(e) => Some(e),
            _ => None,
        }
    }
}

/// Account-specific error details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// Invalid prefix (must be the network's address prefix).
    InvalidPrefix,
    /// Invalid length for account string.
    InvalidLength,
    /// Invalid base32 encoding.
    InvalidEncoding,
    /// Checksum mismatch.
    ChecksumMismatch,
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountError::InvalidPrefix => write!(f, "invalid prefix"),
            AccountError::InvalidLength => write!(f, "invalid length"),
            AccountError::InvalidEncoding => write!(f, "invalid base32 encoding"),
            AccountError::ChecksumMismatch => write!(f, "checksum mismatch"),
        }
    }
}

impl std::error::Error for AccountError {}

/// Block-specific error details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// Missing required field.
    MissingField(&'static str),
    /// Invalid subtype for the operation.
    InvalidSubtype,
    /// Invalid link field.
    InvalidLink,
    /// Previous block hash mismatch.
    PreviousMismatch,
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockError::MissingField(field) => write!(f, "missing required field: {}", field),
            BlockError::InvalidSubtype => write!(f, "invalid block subtype"),
            BlockError::InvalidLink => write!(f, "invalid link field"),
            BlockError::PreviousMismatch => write!(f, "previous block hash mismatch"),
        }
    }
}

impl std::error::Error for BlockError {}

/// Amount-specific error details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    /// Value overflow.
    Overflow,
    /// Invalid string format.
    InvalidFormat,
    /// Negative value not allowed.
    Negative,
}

impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AmountError::Overflow => write!(f, "amount overflow"),
            AmountError::InvalidFormat => write!(f, "invalid format"),
            AmountError::Negative => write!(f, "negative values not allowed"),
        }
    }
}

impl std::error::Error for AmountError {}

/// Hex decoding error details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    /// Invalid character in hex string.
    InvalidCharacter,
    /// Invalid length for hex string.
    InvalidLength,
}

impl fmt::Display for HexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HexError::InvalidCharacter => write!(f, "invalid character"),
            HexError::InvalidLength => write!(f, "invalid length"),
        }
    }
}

impl std::error::Error for HexError {}

impl From<hex::FromHexError> for Error {
    fn from(e: hex::FromHexError) -> Self {
        match e {
            hex::FromHexError::InvalidHexCharacter { .. } => {
                Error::HexDecode(HexError::InvalidCharacter)
            }
            hex::FromHexError::OddLength | hex::FromHexError::InvalidStringLength => {
                Error::HexDecode(HexError::InvalidLength)
            }
        }
    }
}

/// RPC-specific error details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcError {
    /// Connection failed.
    ConnectionFailed(String),
    /// Request timeout.
    Timeout,
    /// Invalid response format.
    InvalidResponse(String),
    /// Node returned an error not recognized as one of Pippin's typed
    /// errors.
    NodeError(String),
    /// HTTP status error.
    HttpStatus(u16),
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RpcError::ConnectionFailed(msg) => write!(f, "connection failed: {}", msg),
            RpcError::Timeout => write!(f, "request timeout"),
            RpcError::InvalidResponse(msg) => write!(f, "invalid response: {}", msg),
            RpcError::NodeError(msg) => write!(f, "node error: {}", msg),
            RpcError::HttpStatus(code) => write!(f, "HTTP status: {}", code),
        }
    }
}

impl std::error::Error for RpcError {}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Rpc(RpcError::Timeout)
        } else if let Some(status) = e.status() {
            Error::Rpc(RpcError::HttpStatus(status.as_u16()))
        } else {
            Error::Rpc(RpcError::ConnectionFailed(e.to_string()))
        }
    }
}

/// Work generation error details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkError {
    /// Work generation cancelled.
    Cancelled,
    /// Maximum iterations reached without finding valid work.
    MaxIterations,
    /// External work server error.
    ServerError(String),
}

impl fmt::Display for WorkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkError::Cancelled => write!(f, "work generation cancelled"),
            WorkError::MaxIterations => write!(f, "max iterations reached"),
            WorkError::ServerError(msg) => write!(f, "server error: {}", msg),
        }
    }
}

impl std::error::Error for WorkError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            Error::InvalidSeed.to_string(),
            "invalid seed: must be 32 bytes"
        );
        assert_eq!(
            Error::InvalidAccount(AccountError::ChecksumMismatch).to_string(),
            "invalid account: checksum mismatch"
        );
        assert_eq!(
            Error::InvalidBlock(BlockError::MissingField("balance")).to_string(),
            "invalid block: missing required field: balance"
        );
    }

    #[test]
    fn test_server_error_display() {
        assert_eq!(Error::WalletNotFound.to_string(), "wallet not found");
        assert_eq!(Error::WalletLocked.to_string(), "wallet locked");
        assert_eq!(Error::WalletNotLocked.to_string(), "wallet not locked");
        assert_eq!(
            Error::AccountAlreadyExists.to_string(),
            "account already exists"
        );
        assert_eq!(Error::AccountNotFound.to_string(), "account not found");
        assert_eq!(Error::BlockNotFound.to_string(), "block not found");
        assert_eq!(
            Error::InsufficientBalance.to_string(),
            "insufficient balance"
        );
        assert_eq!(Error::WorkFailed.to_string(), "failed to generate work");
        assert_eq!(Error::ProcessFailed.to_string(), "rpc process failed");
        assert_eq!(Error::NotImplemented.to_string(), "not implemented");
    }

    #[test]
    fn test_account_error_display() {
        assert_eq!(AccountError::InvalidPrefix.to_string(), "invalid prefix");
        assert_eq!(AccountError::InvalidLength.to_string(), "invalid length");
        assert_eq!(
            AccountError::InvalidEncoding.to_string(),
            "invalid base32 encoding"
        );
        assert_eq!(
            AccountError::ChecksumMismatch.to_string(),
            "checksum mismatch"
        );
    }

    #[test]
    fn test_amount_error_display() {
        assert_eq!(AmountError::Overflow.to_string(), "amount overflow");
        assert_eq!(AmountError::InvalidFormat.to_string(), "invalid format");
        assert_eq!(
            AmountError::Negative.to_string(),
            "negative values not allowed"
        );
    }

    #[test]
    fn test_work_error_display() {
        assert_eq!(
            WorkError::Cancelled.to_string(),
            "work generation cancelled"
        );
        assert_eq!(
            WorkError::MaxIterations.to_string(),
            "max iterations reached"
        );
        assert_eq!(
            WorkError::ServerError("timeout".to_string()).to_string(),
            "server error: timeout"
        );
    }
}
