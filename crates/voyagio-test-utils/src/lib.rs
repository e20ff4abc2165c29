// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Voyagio integration tests.
//!
//! Provides mock collaborators and harness infrastructure for fast,
//! deterministic, CI-runnable tests without external services.
//!
//! # Components
//!
//! - [`MemoryTripStore`] - In-memory `TripStore` with the same guarded
//!   conditional-write semantics as the SQLite backend
//! - [`ScriptedResearch`] / [`ScriptedPlanner`] - Queue-backed planner
//!   mocks with failure injection
//! - [`TestHarness`] - Assembles a full workflow over a memory store or
//!   a temp SQLite database

pub mod harness;
pub mod memory_store;
pub mod mocks;

pub use harness::TestHarness;
pub use memory_store::MemoryTripStore;
pub use mocks::{ScriptedPlanner, ScriptedResearch};
