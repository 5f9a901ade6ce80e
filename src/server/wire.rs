//! Maps the internal [`Error`] enum to the wire strings of SPEC_FULL.md
//! §7. This is the single place that turns a typed error into a string a
//! client sees — nothing else should match on error text.

use crate::error::Error;

/// The `"error"` string to report for `err`, logging the full typed
/// error first so nothing is lost at the boundary.
pub fn wire_message(err: &Error) -> &'static str {
    match err {
        Error::Parse
        | Error::InvalidSeed
        | Error::InvalidPrivateKey
        | Error::InvalidPublicKey
        | Error::InvalidAccount(_)
        | Error::InvalidBlockHash
        | Error::InvalidBlock(_)
        | Error::InvalidSignature
        | Error::InvalidWork
        | Error::InvalidAmount(_)
        | Error::HexDecode(_) => {
            tracing::warn!(error = %err, "bad request");
            "Unable to parse json"
        }
        Error::WalletNotFound => {
            tracing::warn!(error = %err, "wallet not found");
            "wallet not found"
        }
        Error::WalletLocked => {
            tracing::warn!(error = %err, "wallet locked");
            "wallet locked"
        }
        Error::WalletNotLocked => {
            tracing::warn!(error = %err, "wallet not locked");
            "wallet not locked"
        }
        Error::AccountAlreadyExists => {
            tracing::warn!(error = %err, "duplicate adhoc account");
            "account already exists"
        }
        Error::AccountNotFound => {
            tracing::warn!(error = %err, "account not found");
            "Account not found"
        }
        Error::BlockNotFound => {
            tracing::warn!(error = %err, "block not found");
            "Block not found"
        }
        Error::InsufficientBalance => {
            tracing::warn!(error = %err, "insufficient balance");
            "insufficient balance"
        }
        Error::WorkFailed => {
            tracing::error!(error = %err, "work generation failed");
            "Failed to generate work"
        }
        Error::ProcessFailed => {
            tracing::error!(error = %err, "upstream process failed");
            "RPC Process failed"
        }
        Error::NotImplemented => "not_implemented",
        Error::DecryptionError => {
            tracing::warn!(error = %err, "decryption failed");
            "Unable to parse json"
        }
        Error::Rpc(_) | Error::WorkGeneration(_) | Error::Persistence(_) => {
            tracing::error!(error = %err, "internal or upstream error");
            "Unable to parse json"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AccountError;

    #[test]
    fn maps_known_kinds() {
        assert_eq!(wire_message(&Error::WalletNotFound), "wallet not found");
        assert_eq!(wire_message(&Error::WalletLocked), "wallet locked");
        assert_eq!(wire_message(&Error::AccountNotFound), "Account not found");
        assert_eq!(wire_message(&Error::BlockNotFound), "Block not found");
        assert_eq!(
            wire_message(&Error::AccountAlreadyExists),
            "account already exists"
        );
        assert_eq!(wire_message(&Error::WorkFailed), "Failed to generate work");
        assert_eq!(wire_message(&Error::ProcessFailed), "RPC Process failed");
        assert_eq!(
            wire_message(&Error::InsufficientBalance),
            "insufficient balance"
        );
        assert_eq!(wire_message(&Error::NotImplemented), "not_implemented");
    }

    #[test]
    fn maps_validation_kinds_to_parse_error() {
        assert_eq!(wire_message(&Error::Parse), "Unable to parse json");
        assert_eq!(
            wire_message(&Error::InvalidAccount(AccountError::InvalidPrefix)),
            "Unable to parse json"
        );
    }
}
