// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the trip REST API.
//!
//! Each handler explicitly invokes the workflow operation (and through
//! it the gate checks) its route requires; no route-string matching
//! decides gating anywhere.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use voyagio_core::types::{HandoffDocument, ProgressReport, TravelerForm, Trip};
use voyagio_core::{CostEstimate, CostEstimateInput, TripIntake, TripPhase, TripStatus, TripSummary};

use crate::error::ApiError;
use crate::server::GatewayState;

/// A trip plus its derived phase, the standard trip-returning body.
#[derive(Debug, Serialize)]
pub struct TripResponse {
    pub phase: TripPhase,
    #[serde(flatten)]
    pub trip: Trip,
}

impl From<Trip> for TripResponse {
    fn from(trip: Trip) -> Self {
        TripResponse {
            phase: TripPhase::of(&trip),
            trip,
        }
    }
}

/// Query parameters for GET /v1/trips.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub status: Option<TripStatus>,
}

/// Response body for GET /v1/trips.
#[derive(Debug, Serialize)]
pub struct TripListResponse {
    pub trips: Vec<TripSummary>,
}

/// Request body for POST /v1/trips/{id}/confirm.
#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub destinations: Vec<String>,
}

/// Request body for POST /v1/trips/{id}/select.
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub option_index: usize,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// GET /health (public, unauthenticated).
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// POST /v1/trips
pub async fn create_trip(
    State(state): State<GatewayState>,
    Json(intake): Json<TripIntake>,
) -> Result<Response, ApiError> {
    let trip = state.workflow.create_trip(intake).await?;
    Ok((StatusCode::CREATED, Json(TripResponse::from(trip))).into_response())
}

/// GET /v1/trips
pub async fn list_trips(
    State(state): State<GatewayState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<TripListResponse>, ApiError> {
    let trips = state.workflow.list_trips(query.status).await?;
    Ok(Json(TripListResponse { trips }))
}

/// GET /v1/trips/{id}
pub async fn get_trip(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<TripResponse>, ApiError> {
    let trip = state.workflow.get_trip(&id).await?;
    Ok(Json(trip.into()))
}

/// POST /v1/trips/{id}/research
pub async fn run_research(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<TripResponse>, ApiError> {
    let trip = state.workflow.run_research(&id).await?;
    Ok(Json(trip.into()))
}

/// POST /v1/trips/{id}/confirm
pub async fn confirm_destinations(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(body): Json<ConfirmRequest>,
) -> Result<Json<TripResponse>, ApiError> {
    let trip = state
        .workflow
        .confirm_destinations(&id, body.destinations)
        .await?;
    Ok(Json(trip.into()))
}

/// POST /v1/trips/{id}/options
pub async fn generate_options(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<TripResponse>, ApiError> {
    let trip = state.workflow.generate_options(&id).await?;
    Ok(Json(trip.into()))
}

/// POST /v1/trips/{id}/select
pub async fn select_option(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(body): Json<SelectRequest>,
) -> Result<Json<TripResponse>, ApiError> {
    let trip = state.workflow.select_option(&id, body.option_index).await?;
    Ok(Json(trip.into()))
}

/// GET /v1/trips/{id}/progress
pub async fn get_progress(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<ProgressReport>, ApiError> {
    let report = state.workflow.get_progress(&id).await?;
    Ok(Json(report))
}

/// POST /v1/trips/{id}/estimate
pub async fn attach_estimate(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(input): Json<CostEstimateInput>,
) -> Result<Json<CostEstimate>, ApiError> {
    let estimate = state.workflow.attach_cost_estimate(&id, &input).await?;
    Ok(Json(estimate))
}

/// POST /v1/estimate (trip-less pure calculation)
pub async fn calculate_estimate(
    State(state): State<GatewayState>,
    Json(input): Json<CostEstimateInput>,
) -> Result<Json<CostEstimate>, ApiError> {
    let estimate = state.workflow.calculate_cost_estimate(&input)?;
    Ok(Json(estimate))
}

/// GET /v1/trips/{id}/handoff
pub async fn get_handoff(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<HandoffDocument>, ApiError> {
    let document = state.workflow.assemble_handoff(&id).await?;
    Ok(Json(document))
}

/// POST /v1/trips/{id}/quote-request
pub async fn submit_quote_request(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    Json(form): Json<TravelerForm>,
) -> Result<Json<TripResponse>, ApiError> {
    let trip = state.workflow.submit_quote_request(&id, form).await?;
    Ok(Json(trip.into()))
}

/// POST /v1/trips/{id}/book
pub async fn mark_booked(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> Result<Json<TripResponse>, ApiError> {
    let trip = state.workflow.mark_booked(&id).await?;
    Ok(Json(trip.into()))
}
