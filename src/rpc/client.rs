//! RPC client for communicating with Nano nodes.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result, RpcError};
use crate::rpc::requests::*;
use crate::rpc::responses::*;
use crate::types::{Account, BlockHash, StateBlock};

/// Asynchronous RPC client for Nano node communication.
///
/// Uses `reqwest` for non-blocking HTTP requests.
///
/// # Example
///
/// ```no_run
/// use pippin::rpc::RpcClient;
///
/// # async fn example() -> pippin::error::Result<()> {
/// let client = RpcClient::new("http://localhost:7076");
/// let account = "nano_1abc...".parse()?;
/// let info = client.account_info(&account).await?;
/// println!("Balance: {}", info.balance);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct RpcClient {
    url: String,
    client: reqwest::Client,
}

impl RpcClient {
    /// Create a new RPC client.
    pub fn new(url: impl Into<String>) -> Self {
        RpcClient {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Get the node URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send a raw RPC request, deserializing the body to [`serde_json::Value`]
    /// first and checking for a generic `"error"` field before attempting the
    /// typed deserialization.
    async fn request<Req: Serialize, Resp: DeserializeOwned>(&self, request: &Req) -> Result<Resp> {
        let json = self.request_raw(request).await?;

        if let Some(error) = check_error(&json) {
            return Err(Error::Rpc(RpcError::NodeError(error)));
        }

        serde_json::from_value(json)
            .map_err(|e| Error::Rpc(RpcError::InvalidResponse(e.to_string())))
    }

    /// Send a raw RPC request and return the undecoded response body.
    async fn request_raw<Req: Serialize>(&self, request: &Req) -> Result<serde_json::Value> {
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| Error::Rpc(RpcError::ConnectionFailed(format!("{}: {}", &self.url, e))))?;

        response
            .json()
            .await
            .map_err(|e| Error::Rpc(RpcError::InvalidResponse(e.to_string())))
    }

    /// Forward an already-assembled request body to the node verbatim and
    /// return its response verbatim — the proxy path for any action the
    /// gateway does not itself implement.
    pub async fn make_request(&self, request: serde_json::Value) -> Result<serde_json::Value> {
        self.request_raw(&request).await
    }

    /// Get account info. Maps the node's `"Account not found"` error to
    /// [`Error::AccountNotFound`] rather than a generic node error.
    pub async fn account_info(&self, account: &Account) -> Result<AccountInfoResponse> {
        let json = self.request_raw(&AccountInfoRequest::new(account)).await?;
        if let Some(error) = check_error(&json) {
            return Err(if error == "Account not found" {
                Error::AccountNotFound
            } else {
                Error::Rpc(RpcError::NodeError(error))
            });
        }
        serde_json::from_value(json).map_err(|e| Error::Rpc(RpcError::InvalidResponse(e.to_string())))
    }

    /// Get block info. Maps the node's `"Block not found"` error to
    /// [`Error::BlockNotFound`] rather than a generic node error.
    pub async fn block_info(&self, hash: &BlockHash) -> Result<BlockInfoResponse> {
        let json = self.request_raw(&BlockInfoRequest::new(hash)).await?;
        if let Some(error) = check_error(&json) {
            return Err(if error == "Block not found" {
                Error::BlockNotFound
            } else {
                Error::Rpc(RpcError::NodeError(error))
            });
        }
        serde_json::from_value(json).map_err(|e| Error::Rpc(RpcError::InvalidResponse(e.to_string())))
    }

    /// Process (submit) a block, addressed on `network`. Any node-reported
    /// error becomes [`Error::ProcessFailed`] rather than a generic node
    /// error, per the publish contract.
    pub async fn process(&self, block: StateBlock, network: crate::constants::Network) -> Result<ProcessResponse> {
        let json = self
            .request_raw(&ProcessRequest::new(block, network))
            .await?;
        if check_error(&json).is_some() {
            return Err(Error::ProcessFailed);
        }
        serde_json::from_value(json).map_err(|e| Error::Rpc(RpcError::InvalidResponse(e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    fn genesis_account() -> Account {
        Account::from_address_str_checked(
            "nano_3t6k35gi95xu6tergt6p69ck76ogmitsa8mnijtpxm9fkcm736xtoncuohr3",
        )
        .unwrap()
    }

    fn genesis_block() -> BlockHash {
        BlockHash::from_hex("991CF190094C00F0B68E2E5F75F6BEE95A2E0BD93CEAA4A6734DB9F19B728948")
            .unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = RpcClient::new("https://example.com");
        assert_eq!(client.url(), "https://example.com");
    }

    #[test]
    fn test_request_serialization() {
        let account = Account::from_public_key(
            &crate::types::PublicKey::from_hex(
                "E89208DD038FBB269987689621D52292AE9C35941A7484756ECCED92A65093BA",
            )
            .unwrap(),
        crate::constants::Network::Nano);

        let request = AccountInfoRequest::new(&account);
        let json = serde_json::to_string(&request).unwrap();

        assert!(json.contains("account_info"));
        assert!(json.contains("nano_"));
    }

    #[tokio::test]
    async fn test_account_info() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(
                r#"{"frontier":"991CF190094C00F0B68E2E5F75F6BEE95A2E0BD93CEAA4A6734DB9F19B728948",
                    "open_block":"991CF190094C00F0B68E2E5F75F6BEE95A2E0BD93CEAA4A6734DB9F19B728948",
                    "representative_block":"991CF190094C00F0B68E2E5F75F6BEE95A2E0BD93CEAA4A6734DB9F19B728948",
                    "balance":"1000000000000000000000000000000",
                    "modified_timestamp":"1234567890",
                    "block_count":"1"}"#,
            )
            .create_async()
            .await;

        let client = RpcClient::new(server.url());
        let info = client.account_info(&genesis_account()).await.unwrap();
        assert!(!info.balance.is_zero());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_account_info_not_found() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"error":"Account not found"}"#)
            .create_async()
            .await;

        let client = RpcClient::new(server.url());
        let result = client.account_info(&genesis_account()).await;
        assert!(matches!(result, Err(Error::AccountNotFound)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_block_info() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(
                r#"{"block_account":"nano_3t6k35gi95xu6tergt6p69ck76ogmitsa8mnijtpxm9fkcm736xtoncuohr3",
                    "amount":"1000000000000000000000000000000",
                    "balance":"1000000000000000000000000000000",
                    "height":"1",
                    "local_timestamp":"1234567890",
                    "confirmed":"true",
                    "contents":{"type":"state","account":null,"previous":null,
                        "representative":null,"balance":null,"link":null,
                        "signature":"0000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000000",
                        "work":"fe00000000000000"}}"#,
            )
            .create_async()
            .await;

        let client = RpcClient::new(server.url());
        let info = client.block_info(&genesis_block()).await.unwrap();
        assert_eq!(info.block_account, genesis_account());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_process_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"error":"Fork"}"#)
            .create_async()
            .await;

        use crate::types::{Link, Raw, Signature, Subtype, Work};
        use core::str::FromStr;

        let block = StateBlock {
            block_type: "state".to_string(),
            account: genesis_account(),
            previous: genesis_block(),
            representative: genesis_account(),
            balance: Raw::from_str("0").unwrap(),
            link: Link::from_bytes([0u8; 32]),
            signature: Some(Signature::from_bytes([0u8; 64])),
            work: Some(Work::from_hex("0000000000000000").unwrap()),
            subtype: Some(Subtype::Send),
        };

        let client = RpcClient::new(server.url());
        let result = client.process(block, crate::constants::Network::Nano).await;
        assert!(matches!(result, Err(Error::ProcessFailed)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_connection_error() {
        let client = RpcClient::new("http://localhost:1");
        let account = genesis_account();
        let result = client.account_info(&account).await;
        assert!(result.is_err());
        if let Err(Error::Rpc(RpcError::ConnectionFailed(msg))) = result {
            assert!(msg.contains("localhost:1"));
        }
    }

    #[tokio::test]
    async fn test_check_error_with_error() {
        let json: serde_json::Value = serde_json::json!({"error": "Account not found"});
        let error = check_error(&json);
        assert_eq!(error, Some("Account not found".to_string()));
    }

    #[tokio::test]
    async fn test_check_error_without_error() {
        let json: serde_json::Value = serde_json::json!({"balance": "100"});
        let error = check_error(&json);
        assert!(error.is_none());
    }

    #[tokio::test]
    async fn test_make_request_proxy() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"count":"1000"}"#)
            .create_async()
            .await;

        let client = RpcClient::new(server.url());
        let response = client
            .make_request(serde_json::json!({"action": "block_count"}))
            .await
            .unwrap();
        assert_eq!(response["count"], "1000");
        mock.assert_async().await;
    }
}
