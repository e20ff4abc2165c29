// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Voyagio trip workflow.
//!
//! This crate provides the shared trip data model, the derived lifecycle
//! phase with its transition table, the error taxonomy, and the
//! collaborator traits every other workspace crate builds on.

pub mod error;
pub mod phase;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::{PhaseViolationCode, VoyagioError};
pub use phase::{PhaseStage, TripPhase};
pub use traits::{ResearchProvider, TripPlanner, TripStore};
pub use types::{
    CostEstimate, CostEstimateInput, Trip, TripIntake, TripProgress, TripStatus, TripSummary,
};
