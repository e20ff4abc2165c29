// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tagged trip lifecycle phase and its transition table.
//!
//! Phase is never persisted. [`TripPhase::of`] derives it from a trip's
//! flag fields, and [`TripPhase::can_transition_to`] is the exhaustive
//! transition table the gates consult. `booked` is a [`TripStatus`]
//! concern set by the human-facing layer after the pipeline ends, so it
//! has no variant here; a booked trip still derives `quote_requested`.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::types::{Trip, TripStatus};

/// Which half of the lifecycle a trip is in. Phase 2 unlocks the
/// booking-adjacent operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PhaseStage {
    Phase1,
    Phase2,
}

/// A trip's derived lifecycle phase.
///
/// The wire names match the lifecycle vocabulary (`intake`, `research`,
/// `destinations_confirmed`, ...) rather than the variant names, which
/// encode the phase-1/phase-2 split for exhaustive matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
pub enum TripPhase {
    /// Fresh trip: intake captured, no research yet.
    #[strum(serialize = "intake")]
    #[serde(rename = "intake")]
    Phase1Intake,
    /// Research destinations exist, awaiting confirmation.
    #[strum(serialize = "research")]
    #[serde(rename = "research")]
    Phase1Research,
    /// Destinations confirmed; phase-2 operations unlocked.
    #[strum(serialize = "destinations_confirmed")]
    #[serde(rename = "destinations_confirmed")]
    Phase2Confirmed,
    /// Trip options generated and ready for selection.
    #[strum(serialize = "options_ready")]
    #[serde(rename = "options_ready")]
    Phase2OptionsReady,
    /// An option was selected (write-once).
    #[strum(serialize = "selected")]
    #[serde(rename = "selected")]
    Phase2Selected,
    /// A quote request was submitted and the handoff written.
    #[strum(serialize = "quote_requested")]
    #[serde(rename = "quote_requested")]
    Phase2QuoteRequested,
}

impl TripPhase {
    /// Derive the phase from a trip's flag fields.
    ///
    /// Later milestones shadow earlier ones: a trip with a selection is
    /// `selected` even though it also has options and confirmation.
    pub fn of(trip: &Trip) -> TripPhase {
        if trip.status != TripStatus::Active || trip.handoff_payload.is_some() {
            return TripPhase::Phase2QuoteRequested;
        }
        if !trip.destinations_confirmed {
            return if trip.research_destinations.is_some() {
                TripPhase::Phase1Research
            } else {
                TripPhase::Phase1Intake
            };
        }
        if trip.selected_option_index.is_some() {
            TripPhase::Phase2Selected
        } else if trip.options.is_some() {
            TripPhase::Phase2OptionsReady
        } else {
            TripPhase::Phase2Confirmed
        }
    }

    /// Which half of the lifecycle this phase belongs to.
    pub fn stage(self) -> PhaseStage {
        match self {
            TripPhase::Phase1Intake | TripPhase::Phase1Research => PhaseStage::Phase1,
            TripPhase::Phase2Confirmed
            | TripPhase::Phase2OptionsReady
            | TripPhase::Phase2Selected
            | TripPhase::Phase2QuoteRequested => PhaseStage::Phase2,
        }
    }

    /// Milestone ordering along the pipeline.
    fn rank(self) -> u8 {
        match self {
            TripPhase::Phase1Intake => 0,
            TripPhase::Phase1Research => 1,
            TripPhase::Phase2Confirmed => 2,
            TripPhase::Phase2OptionsReady => 3,
            TripPhase::Phase2Selected => 4,
            TripPhase::Phase2QuoteRequested => 5,
        }
    }

    /// True when this phase is at or beyond `other` in pipeline order.
    pub fn is_at_least(self, other: TripPhase) -> bool {
        self.rank() >= other.rank()
    }

    /// The transition table.
    ///
    /// Phase-1 targets are always reachable (re-running intake or
    /// research overwrites in place). Phase-2 targets are unreachable
    /// from phase 1: the only way in is the confirmation write, after
    /// which the derived phase is already `destinations_confirmed`.
    /// Within phase 2 every move is permitted here; the specific gates
    /// re-validate options presence and selection state.
    pub fn can_transition_to(self, target: TripPhase) -> bool {
        use TripPhase::*;
        match (self, target) {
            (_, Phase1Intake | Phase1Research) => true,
            (
                Phase1Intake | Phase1Research,
                Phase2Confirmed | Phase2OptionsReady | Phase2Selected | Phase2QuoteRequested,
            ) => false,
            (
                Phase2Confirmed | Phase2OptionsReady | Phase2Selected | Phase2QuoteRequested,
                Phase2Confirmed | Phase2OptionsReady | Phase2Selected | Phase2QuoteRequested,
            ) => true,
        }
    }
}
