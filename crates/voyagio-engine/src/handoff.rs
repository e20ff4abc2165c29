// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Handoff document assembly.
//!
//! A handoff is a self-contained snapshot for the human agent who takes
//! over booking: intake, confirmed destinations, the chosen option and
//! itinerary, hotel shortlists, and pricing. Assembly is pure; the
//! workflow decides when to persist the result (quote submission) versus
//! return it as a read (handoff preview).

use voyagio_core::types::{HandoffDocument, TravelerForm, Trip};
use voyagio_core::VoyagioError;

/// Validate a traveler contact form before any store access.
pub fn validate_traveler_form(form: &TravelerForm) -> Result<(), VoyagioError> {
    if form.primary_name.trim().is_empty() {
        return Err(VoyagioError::Validation {
            field: "primary_name".into(),
            message: "primary contact name is required".into(),
        });
    }
    let email = form.email.trim();
    if email.is_empty() {
        return Err(VoyagioError::Validation {
            field: "email".into(),
            message: "contact email is required".into(),
        });
    }
    if !email.contains('@') {
        return Err(VoyagioError::Validation {
            field: "email".into(),
            message: "contact email must contain '@'".into(),
        });
    }
    Ok(())
}

/// Assemble a handoff document from a trip snapshot.
///
/// Pure except for the generation timestamp: the same snapshot always
/// yields the same document body.
pub fn build_handoff(
    trip: &Trip,
    traveler_contact: Option<TravelerForm>,
    generated_at: String,
) -> HandoffDocument {
    HandoffDocument {
        trip_id: trip.id.clone(),
        generated_at,
        trip_created_at: trip.created_at.clone(),
        status: trip.status,
        intake: trip.intake.clone(),
        traveler_contact,
        confirmed_destinations: trip.confirmed_destinations.clone(),
        selected_option: trip.selected_option().cloned(),
        itinerary: trip.itinerary.clone(),
        hotels_shown: trip.variants.hotels_shown.clone(),
        hotels_selected: trip.variants.hotels_selected.clone(),
        airfare_estimate: trip.variants.airfare_estimate,
        cost_estimate: trip.variants.cost_estimate.clone(),
    }
}
