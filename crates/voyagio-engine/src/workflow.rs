// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The trip workflow orchestrator.
//!
//! Every operation is a single read-modify-write scoped to one trip id.
//! Gates fail fast on stale state, but the store's conditional writes
//! are the enforcement point: when a guarded write reports no row
//! changed, the orchestrator re-reads and classifies the refusal into
//! the precise phase violation instead of guessing from its earlier
//! snapshot. No state is held between invocations.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use voyagio_core::types::{
    now_iso, HandoffDocument, ProgressReport, Trip, TripProgress, TripSummary, VariantData,
};
use voyagio_core::{
    CostEstimate, CostEstimateInput, PhaseViolationCode, ResearchProvider, TripIntake,
    TripPlanner, TripStatus, TripStore, VoyagioError,
};

use crate::gate::PhaseGate;
use crate::handoff::{build_handoff, validate_traveler_form};
use crate::progress::ProgressTracker;

/// Orchestrates the trip lifecycle over a store and planner collaborators.
pub struct TripWorkflow {
    store: Arc<dyn TripStore>,
    research: Arc<dyn ResearchProvider>,
    planner: Arc<dyn TripPlanner>,
    gate: PhaseGate,
    progress: ProgressTracker,
}

impl TripWorkflow {
    pub fn new(
        store: Arc<dyn TripStore>,
        research: Arc<dyn ResearchProvider>,
        planner: Arc<dyn TripPlanner>,
    ) -> Self {
        let gate = PhaseGate::new(store.clone());
        let progress = ProgressTracker::new(store.clone());
        Self {
            store,
            research,
            planner,
            gate,
            progress,
        }
    }

    /// The gate, for callers that pre-flight before invoking an operation.
    pub fn gate(&self) -> &PhaseGate {
        &self.gate
    }

    fn phase_violation(code: PhaseViolationCode) -> VoyagioError {
        VoyagioError::PhaseViolation { code }
    }

    /// Validate intake, assign an id, and persist the initial record.
    pub async fn create_trip(&self, intake: TripIntake) -> Result<Trip, VoyagioError> {
        if !intake.surnames.iter().any(|s| !s.trim().is_empty()) {
            return Err(VoyagioError::Validation {
                field: "surnames".into(),
                message: "at least one traveler surname is required".into(),
            });
        }
        if intake.party_size() == 0 {
            return Err(VoyagioError::Validation {
                field: "party_size".into(),
                message: "party must have at least one traveler".into(),
            });
        }

        let now = now_iso();
        let trip = Trip {
            id: Uuid::new_v4().to_string(),
            status: TripStatus::Active,
            intake,
            research_destinations: None,
            destinations_confirmed: false,
            confirmed_destinations: vec![],
            options: None,
            selected_option_index: None,
            itinerary: None,
            variants: VariantData::default(),
            handoff_payload: None,
            progress: TripProgress {
                step: "intake".into(),
                message: "Trip created, intake captured".into(),
                percent: 10,
            },
            created_at: now.clone(),
            updated_at: now,
        };
        self.store.create_trip(&trip).await?;
        info!(trip_id = %trip.id, "trip created");
        Ok(trip)
    }

    /// Run destination research for an unconfirmed trip.
    ///
    /// Re-running replaces prior research; once destinations are
    /// confirmed the stored research is frozen and this fails.
    pub async fn run_research(&self, trip_id: &str) -> Result<Trip, VoyagioError> {
        let trip = self.gate.load(trip_id).await?;
        if trip.destinations_confirmed {
            return Err(Self::phase_violation(PhaseViolationCode::AlreadyConfirmed));
        }

        self.progress.record(trip_id, "intake").await;
        let research = self.research.research(&trip.intake).await?;
        debug!(
            trip_id,
            destinations = research.destinations.len(),
            "research produced"
        );

        if !self.store.set_research(trip_id, &research).await? {
            return Err(self.classify_research_refusal(trip_id).await);
        }
        self.progress.record(trip_id, "research").await;
        self.gate.load(trip_id).await
    }

    async fn classify_research_refusal(&self, trip_id: &str) -> VoyagioError {
        match self.gate.load(trip_id).await {
            Ok(trip) if trip.destinations_confirmed => {
                Self::phase_violation(PhaseViolationCode::AlreadyConfirmed)
            }
            Ok(_) => VoyagioError::Internal("research write refused unexpectedly".into()),
            Err(err) => err,
        }
    }

    /// Confirm the traveler's destination choices, unlocking phase 2.
    pub async fn confirm_destinations(
        &self,
        trip_id: &str,
        chosen: Vec<String>,
    ) -> Result<Trip, VoyagioError> {
        let chosen: Vec<String> = chosen
            .into_iter()
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty())
            .collect();
        if chosen.is_empty() {
            return Err(VoyagioError::Validation {
                field: "destinations".into(),
                message: "at least one destination must be chosen".into(),
            });
        }

        self.gate.check_confirmation_eligibility(trip_id).await?;
        if !self.store.confirm_destinations(trip_id, &chosen).await? {
            return Err(self.classify_confirmation_refusal(trip_id).await);
        }
        info!(trip_id, destinations = chosen.len(), "destinations confirmed");
        self.gate.load(trip_id).await
    }

    async fn classify_confirmation_refusal(&self, trip_id: &str) -> VoyagioError {
        match self.gate.load(trip_id).await {
            Ok(trip) if trip.destinations_confirmed => {
                Self::phase_violation(PhaseViolationCode::AlreadyConfirmed)
            }
            Ok(trip) if trip.research_destinations.is_none() => {
                Self::phase_violation(PhaseViolationCode::NoResearchDestinations)
            }
            Ok(_) => VoyagioError::Internal("confirmation write refused unexpectedly".into()),
            Err(err) => err,
        }
    }

    /// Generate selectable options plus the hotel shortlist and airfare
    /// range. Phase-2 gated; regeneration is allowed until a selection
    /// exists.
    pub async fn generate_options(&self, trip_id: &str) -> Result<Trip, VoyagioError> {
        let trip = self.gate.check_phase2_access(trip_id).await?;
        if trip.selected_option_index.is_some() {
            return Err(Self::phase_violation(PhaseViolationCode::AlreadySelected));
        }

        self.progress.record(trip_id, "options").await;
        let planned = self.planner.plan_options(&trip).await?;
        debug!(trip_id, options = planned.options.len(), "options planned");

        if !self.store.set_options(trip_id, &planned.options).await? {
            return Err(self.classify_options_refusal(trip_id).await);
        }

        // Shortlist and airfare live in variant data; keep any prior
        // cost estimate and selection-backed hotel picks intact.
        let current = self.gate.load(trip_id).await?;
        let variants = VariantData {
            hotels_shown: planned.hotels_shown,
            airfare_estimate: planned.airfare_estimate,
            ..current.variants
        };
        if !self.store.set_variants(trip_id, &variants).await? {
            return Err(VoyagioError::TripNotFound {
                trip_id: trip_id.to_string(),
            });
        }

        self.progress.record(trip_id, "finalizing").await;
        self.progress.record(trip_id, "complete").await;
        self.gate.load(trip_id).await
    }

    async fn classify_options_refusal(&self, trip_id: &str) -> VoyagioError {
        match self.gate.load(trip_id).await {
            Ok(trip) if !trip.destinations_confirmed => {
                Self::phase_violation(PhaseViolationCode::DestinationsNotConfirmed)
            }
            Ok(trip) if trip.selected_option_index.is_some() => {
                Self::phase_violation(PhaseViolationCode::AlreadySelected)
            }
            Ok(_) => VoyagioError::Internal("options write refused unexpectedly".into()),
            Err(err) => err,
        }
    }

    /// Record the write-once option selection and derive its itinerary.
    ///
    /// Selection is the transition; the itinerary is derived data. If
    /// itinerary generation fails after the selection landed, the
    /// selection stays and re-invoking with the same index retries just
    /// the itinerary.
    pub async fn select_option(&self, trip_id: &str, index: usize) -> Result<Trip, VoyagioError> {
        let trip = self.gate.check_phase2_access(trip_id).await?;
        let option_count = trip.options.as_ref().map_or(0, Vec::len);
        if trip.options.is_none() {
            return Err(Self::phase_violation(PhaseViolationCode::OptionsNotReady));
        }
        if index >= option_count {
            return Err(VoyagioError::Validation {
                field: "option_index".into(),
                message: format!("index {index} out of range for {option_count} options"),
            });
        }

        if !self.store.select_option(trip_id, index).await? {
            let current = self.gate.load(trip_id).await?;
            match current.selected_option_index {
                // Same index, no itinerary yet: a retry after an earlier
                // itinerary failure. Fall through to rebuild it.
                Some(chosen) if chosen == index && current.itinerary.is_none() => {
                    debug!(trip_id, index, "retrying itinerary for existing selection");
                }
                Some(_) => {
                    return Err(Self::phase_violation(PhaseViolationCode::AlreadySelected))
                }
                None if current.options.is_none() => {
                    return Err(Self::phase_violation(PhaseViolationCode::OptionsNotReady))
                }
                None => {
                    return Err(VoyagioError::Internal(
                        "selection write refused unexpectedly".into(),
                    ))
                }
            }
        } else {
            info!(trip_id, index, "option selected");
        }

        let selected = self.gate.load(trip_id).await?;
        let draft = self.planner.build_itinerary(&selected, index).await?;
        if !self.store.set_itinerary(trip_id, &draft.itinerary).await? {
            warn!(trip_id, "itinerary write refused, selection stands");
            return Err(VoyagioError::Internal(
                "itinerary write refused after selection".into(),
            ));
        }

        let variants = VariantData {
            hotels_selected: draft.hotels_selected,
            ..selected.variants
        };
        if !self.store.set_variants(trip_id, &variants).await? {
            return Err(VoyagioError::TripNotFound {
                trip_id: trip_id.to_string(),
            });
        }
        self.gate.load(trip_id).await
    }

    /// Pure estimate calculation, no trip involved.
    pub fn calculate_cost_estimate(
        &self,
        input: &CostEstimateInput,
    ) -> Result<CostEstimate, VoyagioError> {
        voyagio_cost::calculate(input)
    }

    /// Calculate an estimate and persist it into the trip's variant data,
    /// replacing any prior estimate. The computed value is discarded if
    /// the write fails.
    pub async fn attach_cost_estimate(
        &self,
        trip_id: &str,
        input: &CostEstimateInput,
    ) -> Result<CostEstimate, VoyagioError> {
        let trip = self.gate.load(trip_id).await?;
        let estimate = voyagio_cost::calculate(input)?;
        let variants = VariantData {
            cost_estimate: Some(estimate.clone()),
            ..trip.variants
        };
        if !self.store.set_variants(trip_id, &variants).await? {
            return Err(VoyagioError::TripNotFound {
                trip_id: trip_id.to_string(),
            });
        }
        debug!(trip_id, "cost estimate attached");
        Ok(estimate)
    }

    /// Assemble the handoff document. A phase-2 read: once a quote was
    /// submitted the persisted payload is returned verbatim, otherwise a
    /// fresh document is assembled from the current snapshot.
    pub async fn assemble_handoff(&self, trip_id: &str) -> Result<HandoffDocument, VoyagioError> {
        let trip = self.gate.check_phase2_access(trip_id).await?;
        if let Some(payload) = trip.handoff_payload.clone() {
            return Ok(payload);
        }
        Ok(build_handoff(&trip, None, now_iso()))
    }

    /// Validate the traveler form, then atomically persist the handoff
    /// payload and the `quote_requested` transition.
    pub async fn submit_quote_request(
        &self,
        trip_id: &str,
        form: voyagio_core::types::TravelerForm,
    ) -> Result<Trip, VoyagioError> {
        validate_traveler_form(&form)?;
        let trip = self.gate.check_quote_eligibility(trip_id).await?;

        let mut payload = build_handoff(&trip, Some(form), now_iso());
        // The payload is written atomically with the transition, so it
        // records the post-transition status.
        payload.status = TripStatus::QuoteRequested;

        if !self.store.write_handoff(trip_id, &payload).await? {
            return Err(match self.gate.load(trip_id).await {
                Ok(_) => Self::phase_violation(PhaseViolationCode::QuoteAlreadyRequested),
                Err(err) => err,
            });
        }
        info!(trip_id, "quote request submitted");
        self.gate.load(trip_id).await
    }

    /// Flip status `quote_requested` → `booked`. Already-booked trips
    /// are returned unchanged; a trip without a quote request fails.
    pub async fn mark_booked(&self, trip_id: &str) -> Result<Trip, VoyagioError> {
        if self.store.mark_booked(trip_id).await? {
            info!(trip_id, "trip booked");
            return self.gate.load(trip_id).await;
        }
        let trip = self.gate.load(trip_id).await?;
        match trip.status {
            TripStatus::Booked => Ok(trip),
            TripStatus::Active => {
                Err(Self::phase_violation(PhaseViolationCode::QuoteNotRequested))
            }
            TripStatus::QuoteRequested => Err(VoyagioError::Internal(
                "booking write refused unexpectedly".into(),
            )),
        }
    }

    pub async fn get_trip(&self, trip_id: &str) -> Result<Trip, VoyagioError> {
        self.gate.load(trip_id).await
    }

    /// Lightweight listing rows, newest update first.
    pub async fn list_trips(
        &self,
        status: Option<TripStatus>,
    ) -> Result<Vec<TripSummary>, VoyagioError> {
        let trips = self.store.list_trips(status).await?;
        Ok(trips.iter().map(TripSummary::of).collect())
    }

    /// Best-effort progress write; never fails.
    pub async fn update_progress(&self, trip_id: &str, progress: TripProgress) {
        self.progress.update(trip_id, progress).await;
    }

    /// Best-effort ladder milestone by step name; never fails.
    pub async fn record_milestone(&self, trip_id: &str, step: &str) {
        self.progress.record(trip_id, step).await;
    }

    /// The poller-facing progress report with the derived completion flag.
    pub async fn get_progress(&self, trip_id: &str) -> Result<ProgressReport, VoyagioError> {
        let trip = self.gate.load(trip_id).await?;
        Ok(ProgressTracker::report(&trip))
    }
}
