// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only phase gate checks.
//!
//! A gate answers "may this operation proceed for this trip right now"
//! without side effects, so handlers can pre-flight from any code path.
//! Passing a gate is a fail-fast optimization, not the correctness
//! mechanism: the store's guarded writes re-assert every precondition,
//! and the workflow re-classifies when a guarded write loses a race.

use std::sync::Arc;

use tracing::debug;

use voyagio_core::types::Trip;
use voyagio_core::{PhaseViolationCode, TripPhase, TripStore, VoyagioError};

/// Precondition checks for the trip lifecycle, backed by fresh reads.
pub struct PhaseGate {
    store: Arc<dyn TripStore>,
}

impl PhaseGate {
    pub fn new(store: Arc<dyn TripStore>) -> Self {
        Self { store }
    }

    /// Load a trip or fail with `TripNotFound`.
    pub async fn load(&self, trip_id: &str) -> Result<Trip, VoyagioError> {
        self.store
            .get_trip(trip_id)
            .await?
            .ok_or_else(|| VoyagioError::TripNotFound {
                trip_id: trip_id.to_string(),
            })
    }

    /// Gate for any phase-2 operation: the trip must exist and have its
    /// destinations confirmed. Returns the snapshot the check was made
    /// against.
    pub async fn check_phase2_access(&self, trip_id: &str) -> Result<Trip, VoyagioError> {
        let trip = self.load(trip_id).await?;
        if !trip.destinations_confirmed {
            debug!(trip_id, "phase-2 access refused: destinations not confirmed");
            return Err(VoyagioError::PhaseViolation {
                code: PhaseViolationCode::DestinationsNotConfirmed,
            });
        }
        Ok(trip)
    }

    /// Gate for destination confirmation: not yet confirmed, and research
    /// output present to confirm against.
    pub async fn check_confirmation_eligibility(
        &self,
        trip_id: &str,
    ) -> Result<Trip, VoyagioError> {
        let trip = self.load(trip_id).await?;
        if trip.destinations_confirmed {
            return Err(VoyagioError::PhaseViolation {
                code: PhaseViolationCode::AlreadyConfirmed,
            });
        }
        if trip.research_destinations.is_none() {
            return Err(VoyagioError::PhaseViolation {
                code: PhaseViolationCode::NoResearchDestinations,
            });
        }
        Ok(trip)
    }

    /// Gate for option selection: phase 2, options generated, and no
    /// prior selection (first selection wins).
    pub async fn check_option_selection_eligibility(
        &self,
        trip_id: &str,
    ) -> Result<Trip, VoyagioError> {
        let trip = self.check_phase2_access(trip_id).await?;
        if trip.options.is_none() {
            return Err(VoyagioError::PhaseViolation {
                code: PhaseViolationCode::OptionsNotReady,
            });
        }
        if trip.selected_option_index.is_some() {
            return Err(VoyagioError::PhaseViolation {
                code: PhaseViolationCode::AlreadySelected,
            });
        }
        Ok(trip)
    }

    /// Gate for quote submission: phase 2 and no handoff written yet.
    pub async fn check_quote_eligibility(&self, trip_id: &str) -> Result<Trip, VoyagioError> {
        let trip = self.check_phase2_access(trip_id).await?;
        if TripPhase::of(&trip) == TripPhase::Phase2QuoteRequested {
            return Err(VoyagioError::PhaseViolation {
                code: PhaseViolationCode::QuoteAlreadyRequested,
            });
        }
        Ok(trip)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{confirmed_trip, fresh_trip, researched_trip, MemoryStore};
    use voyagio_core::types::TripOption;

    fn violation(err: VoyagioError) -> PhaseViolationCode {
        err.violation_code().expect("expected a phase violation")
    }

    #[tokio::test]
    async fn phase2_access_missing_trip() {
        let store = Arc::new(MemoryStore::default());
        let gate = PhaseGate::new(store);
        let err = gate.check_phase2_access("nope").await.unwrap_err();
        assert!(matches!(err, VoyagioError::TripNotFound { .. }));
    }

    #[tokio::test]
    async fn phase2_access_unconfirmed_trip() {
        let store = Arc::new(MemoryStore::default());
        store.insert(fresh_trip("t-1")).await;
        let gate = PhaseGate::new(store);

        let err = gate.check_phase2_access("t-1").await.unwrap_err();
        assert_eq!(violation(err), PhaseViolationCode::DestinationsNotConfirmed);
    }

    #[tokio::test]
    async fn phase2_access_confirmed_trip_returns_snapshot() {
        let store = Arc::new(MemoryStore::default());
        store.insert(confirmed_trip("t-2")).await;
        let gate = PhaseGate::new(store);

        let trip = gate.check_phase2_access("t-2").await.unwrap();
        assert_eq!(trip.id, "t-2");
        assert!(trip.destinations_confirmed);
    }

    #[tokio::test]
    async fn confirmation_requires_research() {
        let store = Arc::new(MemoryStore::default());
        store.insert(fresh_trip("t-3")).await;
        let gate = PhaseGate::new(store.clone());

        let err = gate.check_confirmation_eligibility("t-3").await.unwrap_err();
        assert_eq!(violation(err), PhaseViolationCode::NoResearchDestinations);

        store.insert(researched_trip("t-4")).await;
        gate.check_confirmation_eligibility("t-4").await.unwrap();
    }

    #[tokio::test]
    async fn confirmation_rejected_when_already_confirmed() {
        let store = Arc::new(MemoryStore::default());
        store.insert(confirmed_trip("t-5")).await;
        let gate = PhaseGate::new(store);

        let err = gate.check_confirmation_eligibility("t-5").await.unwrap_err();
        assert_eq!(violation(err), PhaseViolationCode::AlreadyConfirmed);
    }

    #[tokio::test]
    async fn selection_requires_options() {
        let store = Arc::new(MemoryStore::default());
        store.insert(confirmed_trip("t-6")).await;
        let gate = PhaseGate::new(store);

        let err = gate
            .check_option_selection_eligibility("t-6")
            .await
            .unwrap_err();
        assert_eq!(violation(err), PhaseViolationCode::OptionsNotReady);
    }

    #[tokio::test]
    async fn selection_is_write_once() {
        let store = Arc::new(MemoryStore::default());
        let mut trip = confirmed_trip("t-7");
        trip.options = Some(vec![TripOption {
            title: "Option A".into(),
            summary: "s".into(),
            destinations: vec!["Lisbon".into()],
            pace: None,
            highlights: vec![],
        }]);
        trip.selected_option_index = Some(0);
        store.insert(trip).await;
        let gate = PhaseGate::new(store);

        // Rejected regardless of which index a caller would propose next.
        let err = gate
            .check_option_selection_eligibility("t-7")
            .await
            .unwrap_err();
        assert_eq!(violation(err), PhaseViolationCode::AlreadySelected);
    }

    #[tokio::test]
    async fn quote_gate_rejects_second_request() {
        let store = Arc::new(MemoryStore::default());
        let mut trip = confirmed_trip("t-8");
        trip.status = voyagio_core::TripStatus::QuoteRequested;
        store.insert(trip).await;
        let gate = PhaseGate::new(store);

        let err = gate.check_quote_eligibility("t-8").await.unwrap_err();
        assert_eq!(violation(err), PhaseViolationCode::QuoteAlreadyRequested);
    }
}
