//! RPC request builders.

use serde::Serialize;

use crate::constants::Network;
use crate::types::{Account, BlockHash, StateBlock};

/// RPC action for account_info.
#[derive(Debug, Serialize)]
pub struct AccountInfoRequest {
    /// The RPC action name.
    pub action: String,
    /// The account address to query.
    pub account: String,
    /// Include representative in response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representative: Option<bool>,
    /// Include voting weight in response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<bool>,
    /// Include pending balance (deprecated, use receivable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<bool>,
    /// Include receivable balance in response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receivable: Option<bool>,
}

impl AccountInfoRequest {
    /// Create a new account_info request with default options.
    pub fn new(account: &Account) -> Self {
        AccountInfoRequest {
            action: "account_info".to_string(),
            account: account.as_str().to_string(),
            representative: Some(true),
            weight: Some(true),
            pending: None,
            receivable: Some(true),
        }
    }
}

/// RPC action for block_info.
#[derive(Debug, Serialize)]
pub struct BlockInfoRequest {
    /// The RPC action name.
    pub action: String,
    /// The block hash to query.
    pub hash: String,
    /// Return block contents as JSON object.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_block: Option<bool>,
}

impl BlockInfoRequest {
    /// Create a new block_info request.
    pub fn new(hash: &BlockHash) -> Self {
        BlockInfoRequest {
            action: "block_info".to_string(),
            hash: hash.to_hex(),
            json_block: Some(true),
        }
    }
}

/// RPC action for process (submit block).
#[derive(Debug, Serialize)]
pub struct ProcessRequest {
    /// The RPC action name.
    pub action: String,
    /// Indicates block is in JSON format (must be "true" string).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub json_block: Option<String>,
    /// Block subtype (send, receive, open, change, epoch).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    /// The block to process.
    pub block: ProcessBlock,
}

/// Block format for process request (includes link_as_account).
#[derive(Debug, Serialize)]
pub struct ProcessBlock {
    /// Block type (always "state" for state blocks).
    #[serde(rename = "type")]
    pub block_type: String,
    /// The account this block belongs to.
    pub account: String,
    /// Hash of the previous block (zero for open blocks).
    pub previous: String,
    /// The representative for this account.
    pub representative: String,
    /// The balance after this block in raw.
    pub balance: String,
    /// The link field (destination/source depending on subtype).
    pub link: String,
    /// The link field interpreted as an account address.
    pub link_as_account: String,
    /// The block signature.
    pub signature: String,
    /// The proof of work.
    pub work: String,
}

impl ProcessRequest {
    /// Create a new process request from a state block, addressed on `network`.
    pub fn new(block: StateBlock, network: Network) -> Self {
        let subtype = block.subtype.as_ref().map(|s| s.as_str().to_string());

        // Convert link to account format for link_as_account
        let link_as_account = Account::from_public_key(&block.link.as_public_key(), network)
            .as_str()
            .to_string();

        let process_block = ProcessBlock {
            block_type: "state".to_string(),
            account: block.account.as_str().to_string(),
            previous: block.previous.to_hex(),
            representative: block.representative.as_str().to_string(),
            balance: block.balance.to_string(),
            link: block.link.to_hex(),
            link_as_account,
            signature: block
                .signature
                .map(|s| hex::encode_upper(s.as_bytes()))
                .unwrap_or_default(),
            work: block.work.map(|w| w.to_hex()).unwrap_or_default(),
        };

        ProcessRequest {
            action: "process".to_string(),
            json_block: Some("true".to_string()),
            subtype,
            block: process_block,
        }
    }
}
