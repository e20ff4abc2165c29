// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Voyagio trip workflow engine.
//!
//! Stateless orchestration over a [`TripStore`](voyagio_core::TripStore):
//! the [`PhaseGate`] fail-fast precondition checks, the best-effort
//! [`ProgressTracker`], handoff assembly, the [`TripWorkflow`]
//! orchestrator, and a deterministic built-in [`CatalogPlanner`] used
//! when no external research/planning collaborator is wired in.

pub mod catalog;
pub mod gate;
pub mod handoff;
pub mod progress;
pub mod workflow;

pub use catalog::CatalogPlanner;
pub use gate::PhaseGate;
pub use progress::{ProgressTracker, LADDER};
pub use workflow::TripWorkflow;

#[cfg(test)]
pub(crate) mod testutil;
