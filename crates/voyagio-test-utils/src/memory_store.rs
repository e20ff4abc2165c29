// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `TripStore` for tests.
//!
//! Mirrors the SQLite backend's guarded conditional writes: every
//! mutation re-asserts its precondition against current state and
//! reports via the returned `bool` whether the write landed. Tests
//! exercising refusal classification therefore behave identically on
//! this store and on the real one.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use voyagio_core::types::{
    now_iso, DestinationResearch, HandoffDocument, Itinerary, Trip, TripOption, TripProgress,
    TripStatus, VariantData,
};
use voyagio_core::{TripStore, VoyagioError};

/// In-memory trip store with guarded conditional updates and failure
/// injection.
#[derive(Default)]
pub struct MemoryTripStore {
    trips: RwLock<HashMap<String, Trip>>,
    fail_writes: AtomicBool,
}

impl MemoryTripStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, bypassing create-time validation.
    pub async fn insert(&self, trip: Trip) {
        self.trips.write().await.insert(trip.id.clone(), trip);
    }

    /// Number of stored trips.
    pub async fn len(&self) -> usize {
        self.trips.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.trips.read().await.is_empty()
    }

    /// When enabled, every mutation fails with a storage error. Reads
    /// keep working so tests can verify nothing changed.
    pub fn inject_write_failures(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn write_allowed(&self) -> Result<(), VoyagioError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(VoyagioError::Storage {
                source: "injected write failure".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TripStore for MemoryTripStore {
    async fn initialize(&self) -> Result<(), VoyagioError> {
        Ok(())
    }

    async fn close(&self) -> Result<(), VoyagioError> {
        Ok(())
    }

    async fn create_trip(&self, trip: &Trip) -> Result<(), VoyagioError> {
        self.write_allowed()?;
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
        Ok(self.trips.read().await.get(trip_id).cloned())
    }

    async fn list_trips(&self, status: Option<TripStatus>) -> Result<Vec<Trip>, VoyagioError> {
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
        self.write_allowed()?;
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
        self.write_allowed()?;
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
        self.write_allowed()?;
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
        self.write_allowed()?;
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
        self.write_allowed()?;
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
        self.write_allowed()?;
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
        self.write_allowed()?;
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
        self.write_allowed()?;
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
        self.write_allowed()?;
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
