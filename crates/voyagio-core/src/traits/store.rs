// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trip store trait for persistence backends.
//!
//! Mutating methods that guard a lifecycle precondition are
//! *conditional writes*: the backend must re-assert the precondition in
//! the write itself (not just trust the caller's earlier read) and
//! report via the returned `bool` whether a row actually changed. This
//! is what closes the check-then-write race between two requests that
//! both passed a gate on stale state: exactly one write lands, the
//! other returns `false` and the engine re-reads to classify the loss.

use async_trait::async_trait;

use crate::error::VoyagioError;
use crate::types::{
    DestinationResearch, HandoffDocument, Itinerary, Trip, TripOption, TripProgress, TripStatus,
    VariantData,
};

/// Durable keyed storage for trip records.
///
/// Implementations own the persisted records outright; the workflow
/// engine keeps no state between invocations. Every successful mutation
/// refreshes the trip's `updated_at`.
#[async_trait]
pub trait TripStore: Send + Sync {
    /// Initializes the backend (migrations, pragmas, connection setup).
    async fn initialize(&self) -> Result<(), VoyagioError>;

    /// Closes the backend, flushing pending writes.
    async fn close(&self) -> Result<(), VoyagioError>;

    /// Inserts a new trip record. Fails if the id already exists.
    async fn create_trip(&self, trip: &Trip) -> Result<(), VoyagioError>;

    /// Fetches a trip by id, or `None` when no such trip exists.
    async fn get_trip(&self, trip_id: &str) -> Result<Option<Trip>, VoyagioError>;

    /// Lists trips, optionally filtered by status, newest update first.
    async fn list_trips(&self, status: Option<TripStatus>) -> Result<Vec<Trip>, VoyagioError>;

    /// Replaces the research output. Guarded: only while the trip is
    /// still unconfirmed. Returns `false` if the trip is missing or
    /// already confirmed.
    async fn set_research(
        &self,
        trip_id: &str,
        research: &DestinationResearch,
    ) -> Result<bool, VoyagioError>;

    /// Flips `destinations_confirmed` and records the chosen names, in
    /// one write. Guarded: unconfirmed and research present. Returns
    /// `false` when the precondition no longer holds.
    async fn confirm_destinations(
        &self,
        trip_id: &str,
        destinations: &[String],
    ) -> Result<bool, VoyagioError>;

    /// Replaces the generated options. Guarded: confirmed and no option
    /// selected yet (regeneration must not invalidate a selection).
    async fn set_options(
        &self,
        trip_id: &str,
        options: &[TripOption],
    ) -> Result<bool, VoyagioError>;

    /// Records the write-once selection. Guarded: options present, no
    /// prior selection, and `index` within the stored option count.
    async fn select_option(&self, trip_id: &str, index: usize) -> Result<bool, VoyagioError>;

    /// Replaces the itinerary. Guarded: an option has been selected.
    async fn set_itinerary(
        &self,
        trip_id: &str,
        itinerary: &Itinerary,
    ) -> Result<bool, VoyagioError>;

    /// Replaces the variant-data bag. Returns `false` only when the
    /// trip is missing.
    async fn set_variants(
        &self,
        trip_id: &str,
        variants: &VariantData,
    ) -> Result<bool, VoyagioError>;

    /// Overwrites the volatile progress snapshot. Returns `false` only
    /// when the trip is missing.
    async fn set_progress(
        &self,
        trip_id: &str,
        progress: &TripProgress,
    ) -> Result<bool, VoyagioError>;

    /// Writes the handoff payload and the `quote_requested` status in
    /// one atomic write. Guarded: status still `active` and no payload
    /// yet. Neither half is ever observable without the other.
    async fn write_handoff(
        &self,
        trip_id: &str,
        payload: &HandoffDocument,
    ) -> Result<bool, VoyagioError>;

    /// Advances status `quote_requested` → `booked`. Guarded: any other
    /// prior status returns `false`.
    async fn mark_booked(&self, trip_id: &str) -> Result<bool, VoyagioError>;
}
