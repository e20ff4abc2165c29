// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state. The public router
//! carries only `/health`; every `/v1` route sits behind the bearer
//! auth middleware.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use voyagio_core::VoyagioError;
use voyagio_engine::TripWorkflow;

use crate::auth::{auth_middleware, AuthConfig};
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    /// The workflow engine serving every operation.
    pub workflow: Arc<TripWorkflow>,
    /// Process start time for uptime reporting.
    pub start_time: Instant,
}

/// Gateway server configuration (mirrors `GatewayConfig` from
/// `voyagio-config` to avoid a config-crate dependency here).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Bearer token for auth (`None` = protected routes reject all).
    pub auth_token: Option<String>,
}

/// Assemble the full router: public health plus the auth-protected API.
pub fn build_router(state: GatewayState, auth: AuthConfig) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .with_state(state.clone());

    let api_routes = Router::new()
        .route(
            "/v1/trips",
            post(handlers::create_trip).get(handlers::list_trips),
        )
        .route("/v1/trips/{id}", get(handlers::get_trip))
        .route("/v1/trips/{id}/research", post(handlers::run_research))
        .route("/v1/trips/{id}/confirm", post(handlers::confirm_destinations))
        .route("/v1/trips/{id}/options", post(handlers::generate_options))
        .route("/v1/trips/{id}/select", post(handlers::select_option))
        .route("/v1/trips/{id}/progress", get(handlers::get_progress))
        .route("/v1/trips/{id}/estimate", post(handlers::attach_estimate))
        .route("/v1/trips/{id}/handoff", get(handlers::get_handoff))
        .route(
            "/v1/trips/{id}/quote-request",
            post(handlers::submit_quote_request),
        )
        .route("/v1/trips/{id}/book", post(handlers::mark_booked))
        .route("/v1/estimate", post(handlers::calculate_estimate))
        .route_layer(axum_middleware::from_fn_with_state(auth, auth_middleware))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the gateway server; returns when `shutdown` fires or the
/// listener fails.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), VoyagioError> {
    let auth = AuthConfig {
        bearer_token: config.auth_token.clone(),
    };
    let app = build_router(state, auth);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| VoyagioError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| VoyagioError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
