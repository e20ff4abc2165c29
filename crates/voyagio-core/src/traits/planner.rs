// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Generator traits for the research and planning collaborators.
//!
//! The engine consumes these as opaque services returning structured
//! data. Whether the implementation is a curated catalog, a web-search
//! pipeline, or an LLM call is invisible to the workflow.

use async_trait::async_trait;

use crate::error::VoyagioError;
use crate::types::{DestinationResearch, ItineraryDraft, PlannedOptions, Trip, TripIntake};

/// Produces destination research from normalized intake.
#[async_trait]
pub trait ResearchProvider: Send + Sync {
    /// Research candidate destinations for the given intake. The output
    /// is presented to the traveler for confirmation.
    async fn research(&self, intake: &TripIntake) -> Result<DestinationResearch, VoyagioError>;
}

/// Produces trip options, itineraries, and booking-adjacent data for a
/// confirmed trip.
#[async_trait]
pub trait TripPlanner: Send + Sync {
    /// Generate selectable options plus the hotel shortlist and airfare
    /// range backing them. Called only after destination confirmation.
    async fn plan_options(&self, trip: &Trip) -> Result<PlannedOptions, VoyagioError>;

    /// Build the day-by-day itinerary and hotel picks for the chosen
    /// option. Called only after a selection exists.
    async fn build_itinerary(
        &self,
        trip: &Trip,
        option_index: usize,
    ) -> Result<ItineraryDraft, VoyagioError>;
}
