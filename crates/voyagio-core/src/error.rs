// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Voyagio trip workflow.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Rejection codes produced by phase gate checks.
///
/// Each code maps to one precondition of the trip lifecycle and carries
/// enough meaning for the caller to render a specific user message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseViolationCode {
    /// A phase-2 operation was attempted before destination confirmation.
    DestinationsNotConfirmed,
    /// Destination confirmation was attempted on an already-confirmed trip.
    AlreadyConfirmed,
    /// Confirmation was attempted before any research destinations exist.
    NoResearchDestinations,
    /// Option selection was attempted before options were generated.
    OptionsNotReady,
    /// Option selection was attempted after an option was already chosen.
    AlreadySelected,
    /// A quote request was submitted for a trip that already has one.
    QuoteAlreadyRequested,
    /// Booking was attempted before any quote request exists.
    QuoteNotRequested,
}

/// The primary error type used across the Voyagio workspace.
#[derive(Debug, Error)]
pub enum VoyagioError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// No trip exists under the given id.
    #[error("trip not found: {trip_id}")]
    TripNotFound { trip_id: String },

    /// Malformed or out-of-range input, named by the offending field.
    #[error("validation failed for `{field}`: {message}")]
    Validation { field: String, message: String },

    /// A lifecycle precondition did not hold for the requested operation.
    #[error("phase violation: {code}")]
    PhaseViolation { code: PhaseViolationCode },

    /// Trip store errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A research or options collaborator failed.
    #[error("planner error: {message}")]
    Planner {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl VoyagioError {
    /// The gate code carried by this error, if it is a phase violation.
    pub fn violation_code(&self) -> Option<PhaseViolationCode> {
        match self {
            VoyagioError::PhaseViolation { code } => Some(*code),
            _ => None,
        }
    }
}
