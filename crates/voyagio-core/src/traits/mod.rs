// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions for the trip workflow.
//!
//! The engine depends only on these seams: a durable [`TripStore`] and
//! the [`ResearchProvider`] / [`TripPlanner`] generators. All use
//! `#[async_trait]` for dynamic dispatch compatibility.

pub mod planner;
pub mod store;

pub use planner::{ResearchProvider, TripPlanner};
pub use store::TripStore;
