//! RPC response types.

use serde::Deserialize;

use crate::types::{Account, BlockHash, Raw, Signature, Work};

/// Account info response.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfoResponse {
    /// Account frontier (latest block hash).
    pub frontier: BlockHash,
    /// Open block hash.
    pub open_block: BlockHash,
    /// Representative block hash.
    pub representative_block: BlockHash,
    /// Current balance.
    pub balance: Raw,
    /// Last modified timestamp.
    pub modified_timestamp: String,
    /// Block count.
    pub block_count: String,
    /// Account version.
    #[serde(default)]
    pub account_version: Option<String>,
    /// Representative account.
    #[serde(default)]
    pub representative: Option<Account>,
    /// Voting weight.
    #[serde(default)]
    pub weight: Option<Raw>,
    /// Pending/receivable balance.
    #[serde(default)]
    pub pending: Option<Raw>,
    /// Receivable balance.
    #[serde(default)]
    pub receivable: Option<Raw>,
    /// Confirmation height.
    #[serde(default)]
    pub confirmation_height: Option<String>,
    /// Confirmation height frontier.
    #[serde(default)]
    pub confirmation_height_frontier: Option<BlockHash>,
}

/// Block info response.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockInfoResponse {
    /// Block account.
    pub block_account: Account,
    /// Amount transferred.
    pub amount: Raw,
    /// Balance after block.
    pub balance: String,
    /// Block height.
    pub height: String,
    /// Local timestamp.
    pub local_timestamp: String,
    /// Whether confirmed.
    pub confirmed: String,
    /// Block contents.
    pub contents: BlockContents,
    /// Block subtype.
    #[serde(default)]
    pub subtype: Option<String>,
}

/// Block contents within block info.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockContents {
    /// Block type (always "state" for state blocks).
    #[serde(rename = "type")]
    pub block_type: String,
    /// Account.
    pub account: Option<Account>,
    /// Previous block hash.
    pub previous: Option<BlockHash>, // Could be genesis block
    /// Representative.
    pub representative: Option<Account>,
    /// Balance.
    pub balance: Option<String>,
    /// Link field.
    pub link: Option<String>,
    /// Link as account (for sends).
    #[serde(default)]
    pub link_as_account: Option<Account>,
    /// Signature.
    pub signature: Signature,
    /// Work.
    pub work: Work,
}

/// Process block response.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessResponse {
    /// Hash of the processed block.
    pub hash: BlockHash,
}

/// Check if a response contains an error.
pub fn check_error(json: &serde_json::Value) -> Option<String> {
    json.get("error").and_then(|e| e.as_str()).map(String::from)
}
