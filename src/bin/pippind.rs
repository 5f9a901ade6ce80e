//! Pippin wallet server entry point.
//!
//! Bootstrap order mirrors `original_source/main.py`: configure logging,
//! initialize the database, start the gateway, then wait for a shutdown
//! signal and close every service handle before exiting.

use std::net::SocketAddr;
use std::sync::Arc;

use pippin::config::Config;
use pippin::constants::Network;
use pippin::server::{router, AppState};

fn env_network() -> Network {
    match std::env::var("PIPPIN_NETWORK").as_deref() {
        Ok("banano") => Network::Banano,
        _ => Network::Nano,
    }
}

fn env_bind_address() -> SocketAddr {
    std::env::var("PIPPIN_BIND")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| "127.0.0.1:7072".parse().expect("valid default address"))
}

fn env_peer_work_urls() -> Vec<String> {
    std::env::var("PIPPIN_PEER_WORK_URLS")
        .ok()
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn config_from_env() -> Config {
    Config::new(
        env_network(),
        env_bind_address(),
        std::env::var("PIPPIN_NODE_URL").unwrap_or_else(|_| "http://localhost:7076".to_string()),
        env_peer_work_urls(),
        std::env::var("PIPPIN_NODE_WORK_GENERATE")
            .map(|s| s == "1" || s.eq_ignore_ascii_case("true"))
            .unwrap_or(false),
        std::env::var("PIPPIN_DATABASE_URL").unwrap_or_else(|_| "sqlite://pippin.db".to_string()),
        std::env::var("PIPPIN_LOG_FILE").ok(),
    )
}

#[tokio::main]
async fn main() {
    pippin::logging::init();

    let config = config_from_env();
    tracing::info!(network = ?config.network, bind = %config.bind_address, "starting pippin");

    let state = match AppState::build(&config).await {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize server");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(config.bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, bind = %config.bind_address, "failed to bind");
            std::process::exit(1);
        }
    };

    tracing::info!(bind = %config.bind_address, "pippin server listening");

    let app = router(state.clone());
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server exited with error");
    }

    tracing::info!("pippin is exiting");
    state.close().await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
