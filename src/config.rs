//! Process-wide configuration.
//!
//! A plain struct built once at startup via an explicit constructor,
//! not a parsed-on-demand global (see the design note in SPEC_FULL.md
//! §9) — grounded on
//! `examples/nervana21-bitcoin-rpc-codegen/config`'s struct shape,
//! minus its TOML-file loading responsibility.

use std::net::SocketAddr;

use crate::constants::Network;

/// Configuration for a running Pippin wallet server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Which network this process serves.
    pub network: Network,
    /// Address the JSON-RPC gateway binds to.
    pub bind_address: SocketAddr,
    /// URL of the upstream Nano/BANANO node RPC endpoint.
    pub node_url: String,
    /// URLs of peer `work_generate` servers raced by the work client.
    pub peer_work_urls: Vec<String>,
    /// Whether the upstream node itself should also be raced for work.
    pub node_work_generate: bool,
    /// `sqlx` connection URL for the persistence layer (e.g.
    /// `sqlite://pippin.db` or `sqlite::memory:`).
    pub database_url: String,
    /// Path to a log file. `None` logs to stderr only.
    pub log_file: Option<String>,
}

impl Config {
    /// Build a configuration from explicit values.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        network: Network,
        bind_address: SocketAddr,
        node_url: impl Into<String>,
        peer_work_urls: Vec<String>,
        node_work_generate: bool,
        database_url: impl Into<String>,
        log_file: Option<String>,
    ) -> Self {
        Config {
            network,
            bind_address,
            node_url: node_url.into(),
            peer_work_urls,
            node_work_generate,
            database_url: database_url.into(),
            log_file,
        }
    }

    /// A configuration suitable for local development: mainnet Nano,
    /// bound to localhost, no peer work servers, an in-memory database.
    pub fn development(node_url: impl Into<String>) -> Self {
        Config {
            network: Network::Nano,
            bind_address: "127.0.0.1:7072".parse().expect("valid socket address"),
            node_url: node_url.into(),
            peer_work_urls: Vec::new(),
            node_work_generate: true,
            database_url: "sqlite::memory:".to_string(),
            log_file: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new() {
        let config = Config::new(
            Network::Banano,
            "0.0.0.0:7072".parse().unwrap(),
            "http://localhost:7072",
            vec!["http://peer1:7000".to_string()],
            false,
            "sqlite:///var/lib/pippin/pippin.db",
            Some("/var/log/pippin.log".to_string()),
        );
        assert_eq!(config.network, Network::Banano);
        assert_eq!(config.node_url, "http://localhost:7072");
        assert_eq!(config.peer_work_urls.len(), 1);
        assert!(!config.node_work_generate);
        assert_eq!(config.log_file.as_deref(), Some("/var/log/pippin.log"));
    }

    #[test]
    fn test_development() {
        let config = Config::development("http://localhost:7076");
        assert_eq!(config.network, Network::Nano);
        assert!(config.node_work_generate);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert!(config.log_file.is_none());
    }
}
