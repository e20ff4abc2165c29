// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `voyagio-core::types` for use across
//! the store trait boundary. This module re-exports them for convenience
//! within the storage crate.

pub use voyagio_core::types::{
    DestinationResearch, HandoffDocument, Itinerary, Trip, TripIntake, TripOption, TripProgress,
    TripStatus, VariantData,
};
