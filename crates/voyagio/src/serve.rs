// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `voyagio serve` command implementation.
//!
//! Wires config → tracing → SQLite store → workflow engine → gateway,
//! then waits for SIGTERM/SIGINT and shuts the stack down in reverse
//! order.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use voyagio_config::model::VoyagioConfig;
use voyagio_core::{TripStore, VoyagioError};
use voyagio_engine::{CatalogPlanner, TripWorkflow};
use voyagio_gateway::{GatewayState, ServerConfig};
use voyagio_store::SqliteTripStore;

/// Runs the `voyagio serve` command.
pub async fn run_serve(config: VoyagioConfig) -> Result<(), VoyagioError> {
    init_tracing(&config.service.log_level);

    info!("starting voyagio serve");

    let store = Arc::new(SqliteTripStore::new(config.storage.clone()));
    store.initialize().await?;
    info!(path = config.storage.database_path.as_str(), "trip store ready");

    // The built-in catalog planner serves both collaborator seams.
    let planner = Arc::new(CatalogPlanner::new());
    let workflow = Arc::new(TripWorkflow::new(
        store.clone(),
        planner.clone(),
        planner,
    ));

    let cancel = install_signal_handler();

    let gateway_handle = if config.gateway.enabled {
        // Fail-closed: refuse to start the gateway with no auth configured.
        if config.gateway.auth_token.is_none() {
            return Err(VoyagioError::Config(
                "gateway enabled but no authentication configured; set gateway.auth_token"
                    .to_string(),
            ));
        }

        let server_config = ServerConfig {
            host: config.gateway.host.clone(),
            port: config.gateway.port,
            auth_token: config.gateway.auth_token.clone(),
        };
        let state = GatewayState {
            workflow: workflow.clone(),
            start_time: Instant::now(),
        };
        let gateway_cancel = cancel.clone();
        let handle = tokio::spawn(async move {
            if let Err(e) = voyagio_gateway::start_server(&server_config, state, gateway_cancel).await
            {
                error!(error = %e, "gateway server error");
            }
        });
        info!(
            host = config.gateway.host.as_str(),
            port = config.gateway.port,
            "gateway started"
        );
        Some(handle)
    } else {
        info!("gateway disabled by configuration");
        None
    };

    cancel.cancelled().await;
    info!("shutting down");

    if let Some(handle) = gateway_handle {
        if let Err(e) = handle.await {
            error!(error = %e, "gateway task panicked during shutdown");
        }
    }

    store.close().await?;
    info!("shutdown complete");
    Ok(())
}

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a token cancelled when either signal is received.
fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm =
                signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");

            tokio::select! {
                _ = ctrl_c => {
                    info!("received SIGINT (Ctrl+C), initiating shutdown");
                }
                _ = sigterm.recv() => {
                    info!("received SIGTERM, initiating shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
            info!("received Ctrl+C, initiating shutdown");
        }

        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("voyagio={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
