//! The `POST /` JSON-RPC gateway (SPEC_FULL.md §6).
//!
//! Mirrors `original_source/server/pippin_server.py`'s single-route
//! `aiohttp` application: one handler reads `action` out of the body and
//! dispatches to a typed operation, an unimplemented-verb list, or the
//! proxy path. Built on `axum`, the corpus's async HTTP framework
//! (`examples/nervana21-bitcoin-rpc-codegen`).

mod dispatch;
mod wire;

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Json;
use axum::routing::post;
use axum::Router;
use serde_json::{json, Value};

use crate::config::Config;
use crate::error::Result;
use crate::rpc::RpcClient;
use crate::store::Store;
use crate::wallet::{BlockPipeline, WalletStore};
use crate::work::{SharedWorkClient, WorkClient, WorkClientConfig};

pub use wire::wire_message;

/// The services a running gateway holds for the lifetime of the
/// process — constructed once at startup and shared behind an `Arc`
/// across every request, never rebuilt per-call.
pub struct AppState {
    wallet_store: Arc<WalletStore>,
    pipeline: BlockPipeline,
    rpc: RpcClient,
}

impl AppState {
    /// Wire up the wallet store, RPC client, and work client for
    /// `config`, connecting the persistence layer along the way.
    pub async fn build(config: &Config) -> Result<Self> {
        let store = Store::connect(&config.database_url).await?;
        let wallet_store = Arc::new(WalletStore::new(store, config.network));
        let rpc = RpcClient::new(config.node_url.clone());
        let work: SharedWorkClient = Arc::new(WorkClient::new(WorkClientConfig {
            peer_urls: config.peer_work_urls.clone(),
            node_url: config.node_url.clone(),
            node_work_generate: config.node_work_generate,
        }));
        let pipeline = BlockPipeline::new(wallet_store.clone(), rpc.clone(), work);

        Ok(AppState {
            wallet_store,
            pipeline,
            rpc,
        })
    }

    /// Close the underlying connection pool. Part of graceful shutdown.
    pub async fn close(&self) {
        self.wallet_store.store().close().await;
    }
}

/// Build the gateway's single-route router over a shared `state`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new().route("/", post(gateway)).with_state(state)
}

async fn gateway(State(state): State<Arc<AppState>>, body: Bytes) -> Json<Value> {
    let request_json: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(_) => return Json(json!({"error": "Unable to parse json"})),
    };

    let Some(action) = request_json.get("action").and_then(Value::as_str) else {
        return Json(json!({"error": "Unable to parse json"}));
    };
    let action = action.to_lowercase();
    let action = action.trim();

    tracing::info!(action, "dispatching request");
    Json(dispatch::dispatch(&state, action, &request_json).await)
}
