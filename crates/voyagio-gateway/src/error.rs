// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping from workflow errors to HTTP responses.
//!
//! One mapping for the whole API surface:
//! - `TripNotFound` → 404
//! - `PhaseViolation` → 409 with the violation code
//! - `Validation` → 422 with the offending field
//! - `Planner` → 502
//! - everything else → 500 (detail logged, not leaked)

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use voyagio_core::VoyagioError;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
    /// Phase violation code, for 409 responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Offending input field, for 422 responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Newtype making `VoyagioError` usable as an axum rejection.
pub struct ApiError(pub VoyagioError);

impl From<VoyagioError> for ApiError {
    fn from(err: VoyagioError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self.0 {
            VoyagioError::TripNotFound { .. } => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: self.0.to_string(),
                    code: None,
                    field: None,
                },
            ),
            VoyagioError::PhaseViolation { code } => (
                StatusCode::CONFLICT,
                ErrorResponse {
                    error: self.0.to_string(),
                    code: Some(code.to_string()),
                    field: None,
                },
            ),
            VoyagioError::Validation { field, .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorResponse {
                    error: self.0.to_string(),
                    code: None,
                    field: Some(field.clone()),
                },
            ),
            VoyagioError::Planner { .. } => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse {
                    error: self.0.to_string(),
                    code: None,
                    field: None,
                },
            ),
            VoyagioError::Storage { .. }
            | VoyagioError::Config(_)
            | VoyagioError::Internal(_) => {
                tracing::error!(error = %self.0, "internal error serving request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "internal error".to_string(),
                        code: None,
                        field: None,
                    },
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
