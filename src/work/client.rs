//! Distributed work-generation client.
//!
//! Races `work_generate` requests against configured peers (and,
//! optionally, the upstream node) plus a local CPU fallback, returning
//! the first valid result. Grounded on
//! `original_source/network/work_client.py`'s `asyncio.wait(tasks,
//! FIRST_COMPLETED, timeout=30)` loop, reexpressed with
//! `FuturesUnordered` and `tokio::time::timeout`.

use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::FuturesUnordered;
use futures_util::StreamExt;
use serde::Deserialize;

use crate::constants::Network;
use crate::error::{Error, Result, WorkError};
use crate::types::BlockHash;
use crate::work::{CpuWorkGenerator, WorkFailureFlag};

const PER_ROUND_TIMEOUT: Duration = Duration::from_secs(30);
const PER_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Configuration for a [`WorkClient`].
#[derive(Debug, Clone)]
pub struct WorkClientConfig {
    /// URLs of peer work-generation servers.
    pub peer_urls: Vec<String>,
    /// The upstream node's RPC URL.
    pub node_url: String,
    /// Whether the upstream node itself should be raced as a peer.
    pub node_work_generate: bool,
}

impl WorkClientConfig {
    fn effective_peers(&self) -> Vec<String> {
        let mut peers = self.peer_urls.clone();
        if self.node_work_generate {
            peers.push(self.node_url.clone());
        }
        peers
    }
}

#[derive(Deserialize)]
struct WorkGenerateReply {
    #[serde(default)]
    work: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Races distributed and local proof-of-work generation.
pub struct WorkClient {
    config: WorkClientConfig,
    http: reqwest::Client,
    failure: WorkFailureFlag,
}

enum RaceOutcome {
    Work(crate::types::Work),
    NoWork,
}

impl WorkClient {
    /// Create a new work client.
    pub fn new(config: WorkClientConfig) -> Self {
        WorkClient {
            config,
            http: reqwest::Client::new(),
            failure: WorkFailureFlag::new(),
        }
    }

    async fn request_peer(
        http: reqwest::Client,
        url: String,
        hash: BlockHash,
        difficulty: u64,
    ) -> RaceOutcome {
        let body = serde_json::json!({
            "action": "work_generate",
            "hash": hash.to_hex(),
            "difficulty": format!("{:016x}", difficulty),
        });

        let result = tokio::time::timeout(PER_REQUEST_TIMEOUT, async {
            let resp = http.post(&url).json(&body).send().await?;
            resp.json::<WorkGenerateReply>().await
        })
        .await;

        match result {
            Ok(Ok(reply)) => {
                if let Some(work_hex) = reply.work {
                    if let Ok(work) = crate::types::Work::from_hex(&work_hex) {
                        return RaceOutcome::Work(work);
                    }
                }
                if let Some(err) = reply.error {
                    tracing::info!(peer = %url, error = %err, "work_generate peer returned error");
                }
                RaceOutcome::NoWork
            }
            Ok(Err(e)) => {
                tracing::info!(peer = %url, error = %e, "work_generate peer request failed");
                RaceOutcome::NoWork
            }
            Err(_) => {
                tracing::info!(peer = %url, "work_generate peer request timed out");
                RaceOutcome::NoWork
            }
        }
    }

    async fn request_local(hash: BlockHash, difficulty: u64) -> RaceOutcome {
        let result = tokio::task::spawn_blocking(move || {
            CpuWorkGenerator::new(Network::Nano).generate(&hash, difficulty, None)
        })
        .await;

        match result {
            Ok(Ok(work)) => RaceOutcome::Work(work),
            _ => RaceOutcome::NoWork,
        }
    }

    fn cancel_peers(&self, peers: Vec<String>, hash: BlockHash) {
        let body = serde_json::json!({
            "action": "work_cancel",
            "hash": hash.to_hex(),
        });
        for url in peers {
            let http = self.http.clone();
            let body = body.clone();
            tokio::spawn(async move {
                let _ = http.post(&url).json(&body).send().await;
            });
        }
    }

    /// Generate proof of work for `hash` at the given difficulty threshold.
    pub async fn generate(&self, hash: &BlockHash, difficulty: u64) -> Result<crate::types::Work> {
        let hash = *hash;
        let peers = self.config.effective_peers();
        let use_local_race = peers.is_empty() || self.failure.is_set().await;

        type BoxedFuture = Pin<Box<dyn std::future::Future<Output = RaceOutcome> + Send>>;
        let mut tasks: FuturesUnordered<BoxedFuture> = FuturesUnordered::new();

        for url in &peers {
            tasks.push(Box::pin(Self::request_peer(
                self.http.clone(),
                url.clone(),
                hash,
                difficulty,
            )));
        }
        if use_local_race {
            tasks.push(Box::pin(Self::request_local(hash, difficulty)));
        }

        while !tasks.is_empty() {
            match tokio::time::timeout(PER_ROUND_TIMEOUT, tasks.next()).await {
                Ok(Some(RaceOutcome::Work(work))) => {
                    self.cancel_peers(peers, hash);
                    return Ok(work);
                }
                Ok(Some(RaceOutcome::NoWork)) => continue,
                Ok(None) => break,
                Err(_) => continue,
            }
        }

        // Every task finished without producing work (or the queue was
        // empty to begin with). Flag peer failure and fall back to an
        // unbounded local generation.
        self.failure.set().await;
        match Self::request_local(hash, difficulty).await {
            RaceOutcome::Work(work) => Ok(work),
            RaceOutcome::NoWork => Err(Error::WorkGeneration(WorkError::ServerError(
                "local fallback generation failed".to_string(),
            ))),
        }
    }

    /// Generate work for a send block under `network`'s send threshold.
    pub async fn generate_send(
        &self,
        hash: &BlockHash,
        network: Network,
    ) -> Result<crate::types::Work> {
        self.generate(hash, network.work_threshold_send()).await
    }

    /// Generate work for a receive/open block under `network`'s receive
    /// threshold.
    pub async fn generate_receive(
        &self,
        hash: &BlockHash,
        network: Network,
    ) -> Result<crate::types::Work> {
        self.generate(hash, network.work_threshold_receive()).await
    }
}

/// Shared handle, suitable for cloning into multiple request handlers.
pub type SharedWorkClient = Arc<WorkClient>;
