// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-crate test doubles for the engine's unit tests.
//!
//! `MemoryStore` mirrors the SQLite store's conditional-write semantics
//! so gate and workflow tests exercise the same refusal paths the real
//! backend produces. The full-featured mocks live in `voyagio-test-utils`;
//! these stay local to avoid a dev-dependency cycle.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use voyagio_core::types::{
    now_iso, DestinationBrief, DestinationResearch, HandoffDocument, Itinerary, Trip, TripIntake,
    TripOption, TripProgress, TripStatus, VariantData,
};
use voyagio_core::{TripStore, VoyagioError};

/// In-memory trip store with guarded conditional updates.
#[derive(Default)]
pub struct MemoryStore {
    trips: RwLock<HashMap<String, Trip>>,
    /// When set, every operation fails with a storage error.
    fail_all: AtomicBool,
}

impl MemoryStore {
    pub async fn insert(&self, trip: Trip) {
        self.trips.write().await.insert(trip.id.clone(), trip);
    }

    pub fn fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    fn check_failure(&self) -> Result<(), VoyagioError> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(VoyagioError::Storage {
                source: "injected storage failure".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TripStore for MemoryStore {
    async fn initialize(&self) -> Result<(), VoyagioError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), VoyagioError> {
        Ok(())
    }

    async fn create_trip(&self, trip: &Trip) -> Result<(), VoyagioError> {
        self.check_failure()?;
        let mut trips = self.trips.write().await;
        if trips.contains_key(&trip.id) {
            return Err(VoyagioError::Storage {
                source: format!("duplicate trip id {}", trip.id).into(),
            });
        }
        trips.insert(trip.id.clone(), trip.clone());
        Ok(())
    }

    async fn get_trip(&self, trip_id: &str) -> Result<Option<Trip>, VoyagioError> {
        self.check_failure()?;
        Ok(self.trips.read().await.get(trip_id).cloned())
    }

    async fn list_trips(&self, status: Option<TripStatus>) -> Result<Vec<Trip>, VoyagioError> {
        self.check_failure()?;
        let trips = self.trips.read().await;
        let mut out: Vec<Trip> = trips
            .values()
            .filter(|t| status.is_none_or(|s| t.status == s))
            .cloned()
            .collect();
        out.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then(a.id.cmp(&b.id)));
        Ok(out)
    }

    async fn set_research(
        &self,
        trip_id: &str,
        research: &DestinationResearch,
    ) -> Result<bool, VoyagioError> {
        self.check_failure()?;
        let mut trips = self.trips.write().await;
        match trips.get_mut(trip_id) {
            Some(trip) if !trip.destinations_confirmed => {
                trip.research_destinations = Some(research.clone());
                trip.updated_at = now_iso();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn confirm_destinations(
        &self,
        trip_id: &str,
        destinations: &[String],
    ) -> Result<bool, VoyagioError> {
        self.check_failure()?;
        let mut trips = self.trips.write().await;
        match trips.get_mut(trip_id) {
            Some(trip) if !trip.destinations_confirmed && trip.research_destinations.is_some() => {
                trip.destinations_confirmed = true;
                trip.confirmed_destinations = destinations.to_vec();
                trip.updated_at = now_iso();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_options(
        &self,
        trip_id: &str,
        options: &[TripOption],
    ) -> Result<bool, VoyagioError> {
        self.check_failure()?;
        let mut trips = self.trips.write().await;
        match trips.get_mut(trip_id) {
            Some(trip) if trip.destinations_confirmed && trip.selected_option_index.is_none() => {
                trip.options = Some(options.to_vec());
                trip.updated_at = now_iso();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn select_option(&self, trip_id: &str, index: usize) -> Result<bool, VoyagioError> {
        self.check_failure()?;
        let mut trips = self.trips.write().await;
        match trips.get_mut(trip_id) {
            Some(trip)
                if trip.selected_option_index.is_none()
                    && trip.options.as_ref().is_some_and(|o| index < o.len()) =>
            {
                trip.selected_option_index = Some(index);
                trip.updated_at = now_iso();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_itinerary(
        &self,
        trip_id: &str,
        itinerary: &Itinerary,
    ) -> Result<bool, VoyagioError> {
        self.check_failure()?;
        let mut trips = self.trips.write().await;
        match trips.get_mut(trip_id) {
            Some(trip) if trip.selected_option_index.is_some() => {
                trip.itinerary = Some(itinerary.clone());
                trip.updated_at = now_iso();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn set_variants(
        &self,
        trip_id: &str,
        variants: &VariantData,
    ) -> Result<bool, VoyagioError> {
        self.check_failure()?;
        let mut trips = self.trips.write().await;
        match trips.get_mut(trip_id) {
            Some(trip) => {
                trip.variants = variants.clone();
                trip.updated_at = now_iso();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_progress(
        &self,
        trip_id: &str,
        progress: &TripProgress,
    ) -> Result<bool, VoyagioError> {
        self.check_failure()?;
        let mut trips = self.trips.write().await;
        match trips.get_mut(trip_id) {
            Some(trip) => {
                trip.progress = progress.clone();
                trip.updated_at = now_iso();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn write_handoff(
        &self,
        trip_id: &str,
        payload: &HandoffDocument,
    ) -> Result<bool, VoyagioError> {
        self.check_failure()?;
        let mut trips = self.trips.write().await;
        match trips.get_mut(trip_id) {
            Some(trip) if trip.status == TripStatus::Active && trip.handoff_payload.is_none() => {
                trip.handoff_payload = Some(payload.clone());
                trip.status = TripStatus::QuoteRequested;
                trip.updated_at = now_iso();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn mark_booked(&self, trip_id: &str) -> Result<bool, VoyagioError> {
        self.check_failure()?;
        let mut trips = self.trips.write().await;
        match trips.get_mut(trip_id) {
            Some(trip) if trip.status == TripStatus::QuoteRequested => {
                trip.status = TripStatus::Booked;
                trip.updated_at = now_iso();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

pub fn sample_intake() -> TripIntake {
    TripIntake {
        surnames: vec!["Okafor".into()],
        party_adults: 2,
        party_children: 0,
        origin: Some("Chicago".into()),
        interests: vec!["food".into(), "history".into()],
        travel_window: Some("early June".into()),
        duration_days: Some(7),
        budget_usd: Some(8000.0),
        notes: None,
    }
}

pub fn fresh_trip(id: &str) -> Trip {
    Trip {
        id: id.to_string(),
        status: TripStatus::Active,
        intake: sample_intake(),
        research_destinations: None,
        destinations_confirmed: false,
        confirmed_destinations: vec![],
        options: None,
        selected_option_index: None,
        itinerary: None,
        variants: VariantData::default(),
        handoff_payload: None,
        progress: TripProgress::default(),
        created_at: now_iso(),
        updated_at: now_iso(),
    }
}

pub fn researched_trip(id: &str) -> Trip {
    let mut trip = fresh_trip(id);
    trip.research_destinations = Some(DestinationResearch {
        destinations: vec![
            DestinationBrief {
                name: "Lisbon".into(),
                country: "Portugal".into(),
                summary: "Hills, tiles, seafood.".into(),
                best_season: Some("spring".into()),
                highlights: vec!["Alfama".into()],
            },
            DestinationBrief {
                name: "Rome".into(),
                country: "Italy".into(),
                summary: "Layers of empire on every corner.".into(),
                best_season: Some("autumn".into()),
                highlights: vec!["Forum".into()],
            },
        ],
        generated_at: now_iso(),
    });
    trip
}

pub fn confirmed_trip(id: &str) -> Trip {
    let mut trip = researched_trip(id);
    trip.destinations_confirmed = true;
    trip.confirmed_destinations = vec!["Lisbon".into(), "Rome".into()];
    trip
}
