// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The trip data model shared across the Voyagio workspace.
//!
//! A [`Trip`] is the central entity: normalized intake, research output,
//! generated options, the selected option's itinerary, a variant-data bag
//! of derived values, and the final handoff document. Lifecycle phase is
//! never stored; it is derived from these fields (see `phase`).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Current UTC time as an ISO 8601 string with millisecond precision.
///
/// All persisted timestamps in Voyagio use this format so records
/// round-trip through SQLite TEXT columns without loss.
pub fn now_iso() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Coarse record status, advanced monotonically by the workflow:
/// `active` → `quote_requested` → `booked`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    /// The trip is moving through the planning pipeline.
    Active,
    /// A quote request was submitted; the handoff document exists.
    QuoteRequested,
    /// A human agent completed the booking.
    Booked,
}

// --- Intake ---

/// Normalized traveler intake captured at trip creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripIntake {
    /// Traveler surnames, lead traveler first. Never empty.
    pub surnames: Vec<String>,
    /// Number of adults travelling.
    pub party_adults: u32,
    /// Number of children travelling.
    #[serde(default)]
    pub party_children: u32,
    /// Departure city or airport, free-form.
    #[serde(default)]
    pub origin: Option<String>,
    /// Interest tags driving research ("food", "hiking", "museums").
    #[serde(default)]
    pub interests: Vec<String>,
    /// Rough travel window, free-form ("early June", "winter holidays").
    #[serde(default)]
    pub travel_window: Option<String>,
    /// Desired trip length in days.
    #[serde(default)]
    pub duration_days: Option<u32>,
    /// Stated budget ceiling in USD, if any.
    #[serde(default)]
    pub budget_usd: Option<f64>,
    /// Free-form notes from the traveler.
    #[serde(default)]
    pub notes: Option<String>,
}

impl TripIntake {
    /// Total party size, adults plus children.
    pub fn party_size(&self) -> u32 {
        self.party_adults + self.party_children
    }

    /// The lead traveler's surname, if intake is well-formed.
    pub fn lead_surname(&self) -> Option<&str> {
        self.surnames.first().map(String::as_str)
    }
}

// --- Research ---

/// One researched destination candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationBrief {
    pub name: String,
    pub country: String,
    /// Two-to-three sentence pitch for this destination.
    pub summary: String,
    #[serde(default)]
    pub best_season: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// Structured research output attached to a trip before confirmation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationResearch {
    pub destinations: Vec<DestinationBrief>,
    pub generated_at: String,
}

impl DestinationResearch {
    /// Names of all researched destinations, in presentation order.
    pub fn destination_names(&self) -> Vec<String> {
        self.destinations.iter().map(|d| d.name.clone()).collect()
    }
}

// --- Options & itinerary ---

/// A packaged trip option presented for selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripOption {
    pub title: String,
    pub summary: String,
    /// Destinations covered by this option, in visiting order.
    pub destinations: Vec<String>,
    /// Pacing label ("relaxed", "balanced", "packed").
    #[serde(default)]
    pub pace: Option<String>,
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// A day in the final itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDay {
    /// 1-based day number.
    pub day: u32,
    pub title: String,
    pub location: String,
    #[serde(default)]
    pub activities: Vec<String>,
    #[serde(default)]
    pub lodging: Option<String>,
}

/// Day-by-day plan produced after an option is selected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub days: Vec<ItineraryDay>,
    pub generated_at: String,
}

/// A hotel the planner surfaced for a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOption {
    pub name: String,
    pub destination: String,
    pub nights: u32,
    /// Nightly rate range in USD.
    pub nightly_low: f64,
    pub nightly_high: f64,
    /// Property style ("boutique", "resort", "guesthouse").
    #[serde(default)]
    pub style: Option<String>,
}

// --- Cost estimation ---

/// Inclusive low/high price range in USD.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

impl PriceRange {
    /// The zero-width range, the sum identity for empty component lists.
    pub const ZERO: PriceRange = PriceRange { low: 0.0, high: 0.0 };

    /// Component-wise sum of two ranges.
    pub fn plus(self, other: PriceRange) -> PriceRange {
        PriceRange {
            low: self.low + other.low,
            high: self.high + other.high,
        }
    }
}

/// One hotel stay line in a cost-estimate input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelStay {
    #[serde(default)]
    pub name: Option<String>,
    pub nights: u32,
    pub nightly_low: f64,
    pub nightly_high: f64,
}

/// A priced line item (tour, transport leg) with a low/high spread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemRange {
    #[serde(default)]
    pub label: Option<String>,
    pub price_low: f64,
    pub price_high: f64,
}

/// Itemized input to the cost estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimateInput {
    pub airfare: PriceRange,
    #[serde(default)]
    pub hotels: Vec<HotelStay>,
    #[serde(default)]
    pub tours: Vec<LineItemRange>,
    #[serde(default)]
    pub transport: Vec<LineItemRange>,
    /// Commission percentage applied to the high bound. Defaults to 15;
    /// must fall in [10, 15] inclusive.
    #[serde(default)]
    pub commission_pct: Option<f64>,
}

/// A commissioned budget estimate with the full component breakdown.
///
/// The total's low bound carries no commission; the high bound is the
/// subtotal high with commission headroom applied and rounded up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub airfare: PriceRange,
    pub hotels: PriceRange,
    pub tours: PriceRange,
    pub transport: PriceRange,
    pub subtotal: PriceRange,
    pub total: PriceRange,
    pub commission_pct: f64,
    pub currency: String,
    pub disclaimer: String,
    pub computed_at: String,
}

// --- Variant data ---

/// Trip-scoped bag of derived data attached alongside the core fields.
///
/// Recomputation replaces individual entries wholesale; nothing in here
/// participates in phase derivation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantData {
    #[serde(default)]
    pub cost_estimate: Option<CostEstimate>,
    /// Hotels surfaced to the traveler during option generation.
    #[serde(default)]
    pub hotels_shown: Vec<HotelOption>,
    /// Hotels backing the selected option.
    #[serde(default)]
    pub hotels_selected: Vec<HotelOption>,
    #[serde(default)]
    pub airfare_estimate: Option<PriceRange>,
}

// --- Progress ---

/// Volatile progress snapshot for long-running pipeline steps.
///
/// Overwritten on every update; never consulted for phase derivation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TripProgress {
    pub step: String,
    pub message: String,
    /// 0-100. Non-decreasing within a single pipeline run (best-effort).
    pub percent: u8,
}

/// Progress snapshot returned to pollers, with the derived completion flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    pub step: String,
    pub message: String,
    pub percent: u8,
    /// True iff the trip's phase is at or beyond `options_ready`.
    pub complete: bool,
}

// --- Handoff ---

/// Traveler contact form submitted with a quote request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelerForm {
    pub primary_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Preferred contact channel ("email", "phone").
    #[serde(default)]
    pub preferred_contact: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Self-contained booking handoff for a human travel agent.
///
/// A snapshot, not a live view: later trip mutations do not change a
/// handoff that was already generated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandoffDocument {
    pub trip_id: String,
    pub generated_at: String,
    pub trip_created_at: String,
    pub status: TripStatus,
    pub intake: TripIntake,
    #[serde(default)]
    pub traveler_contact: Option<TravelerForm>,
    #[serde(default)]
    pub confirmed_destinations: Vec<String>,
    #[serde(default)]
    pub selected_option: Option<TripOption>,
    #[serde(default)]
    pub itinerary: Option<Itinerary>,
    #[serde(default)]
    pub hotels_shown: Vec<HotelOption>,
    #[serde(default)]
    pub hotels_selected: Vec<HotelOption>,
    #[serde(default)]
    pub airfare_estimate: Option<PriceRange>,
    #[serde(default)]
    pub cost_estimate: Option<CostEstimate>,
}

// --- Planner bundles ---

/// Bundle returned by a planner's option-generation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedOptions {
    pub options: Vec<TripOption>,
    #[serde(default)]
    pub hotels_shown: Vec<HotelOption>,
    #[serde(default)]
    pub airfare_estimate: Option<PriceRange>,
}

/// Itinerary plus the hotel picks backing a selected option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDraft {
    pub itinerary: Itinerary,
    #[serde(default)]
    pub hotels_selected: Vec<HotelOption>,
}

// --- Trip ---

/// The central entity: one traveler party's trip through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    /// Opaque unique id (UUID v4), assigned at creation, immutable.
    pub id: String,
    pub status: TripStatus,
    pub intake: TripIntake,
    #[serde(default)]
    pub research_destinations: Option<DestinationResearch>,
    /// Monotonic: once true, stays true for the trip's lifetime.
    pub destinations_confirmed: bool,
    /// Destination names the traveler confirmed, set with the flag.
    #[serde(default)]
    pub confirmed_destinations: Vec<String>,
    #[serde(default)]
    pub options: Option<Vec<TripOption>>,
    /// Write-once: first selection wins.
    #[serde(default)]
    pub selected_option_index: Option<usize>,
    #[serde(default)]
    pub itinerary: Option<Itinerary>,
    #[serde(default)]
    pub variants: VariantData,
    /// Written once, atomically with the `quote_requested` transition.
    #[serde(default)]
    pub handoff_payload: Option<HandoffDocument>,
    #[serde(default)]
    pub progress: TripProgress,
    pub created_at: String,
    pub updated_at: String,
}

impl Trip {
    /// The selected option, when both options and a selection exist.
    pub fn selected_option(&self) -> Option<&TripOption> {
        match (self.selected_option_index, &self.options) {
            (Some(index), Some(options)) => options.get(index),
            _ => None,
        }
    }
}

/// Lightweight listing row for trip overviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripSummary {
    pub id: String,
    pub status: TripStatus,
    pub phase: crate::phase::TripPhase,
    pub lead_surname: String,
    pub party_size: u32,
    pub destination_count: usize,
    pub updated_at: String,
}

impl TripSummary {
    /// Project a full trip record down to its listing row.
    pub fn of(trip: &Trip) -> TripSummary {
        TripSummary {
            id: trip.id.clone(),
            status: trip.status,
            phase: crate::phase::TripPhase::of(trip),
            lead_surname: trip.intake.lead_surname().unwrap_or("(unknown)").to_string(),
            party_size: trip.intake.party_size(),
            destination_count: trip.confirmed_destinations.len(),
            updated_at: trip.updated_at.clone(),
        }
    }
}
