// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles a complete trip workflow over scripted
//! planner mocks and either the in-memory store (default, fastest) or a
//! temp SQLite database (exercising the real persistence path). Helper
//! methods drive a trip through the lifecycle so tests start from the
//! phase they care about.

use std::sync::Arc;

use voyagio_config::model::StorageConfig;
use voyagio_core::types::{TravelerForm, Trip, TripIntake};
use voyagio_core::{TripStore, VoyagioError};
use voyagio_engine::TripWorkflow;
use voyagio_store::SqliteTripStore;

use crate::memory_store::MemoryTripStore;
use crate::mocks::{ScriptedPlanner, ScriptedResearch};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    use_sqlite: bool,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self { use_sqlite: false }
    }

    /// Back the harness with a temp SQLite database instead of the
    /// in-memory store.
    pub fn with_sqlite(mut self) -> Self {
        self.use_sqlite = true;
        self
    }

    /// Build the harness, creating the store and wiring the workflow.
    pub async fn build(self) -> Result<TestHarness, VoyagioError> {
        let mut temp_dir = None;
        let store: Arc<dyn TripStore> = if self.use_sqlite {
            let dir = tempfile::TempDir::new()
                .map_err(|e| VoyagioError::Storage { source: e.into() })?;
            let config = StorageConfig {
                database_path: dir.path().join("trips.db").to_string_lossy().to_string(),
                wal_mode: true,
            };
            temp_dir = Some(dir);
            Arc::new(SqliteTripStore::new(config))
        } else {
            Arc::new(MemoryTripStore::new())
        };
        store.initialize().await?;

        let research = Arc::new(ScriptedResearch::new());
        let planner = Arc::new(ScriptedPlanner::new());
        let workflow = TripWorkflow::new(store.clone(), research.clone(), planner.clone());

        Ok(TestHarness {
            workflow,
            store,
            research,
            planner,
            _temp_dir: temp_dir,
        })
    }
}

/// A fully wired workflow plus handles to its collaborators.
pub struct TestHarness {
    pub workflow: TripWorkflow,
    pub store: Arc<dyn TripStore>,
    pub research: Arc<ScriptedResearch>,
    pub planner: Arc<ScriptedPlanner>,
    _temp_dir: Option<tempfile::TempDir>,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A well-formed intake for tests that do not care about its contents.
    pub fn sample_intake() -> TripIntake {
        TripIntake {
            surnames: vec!["Fixture".into()],
            party_adults: 2,
            party_children: 0,
            origin: Some("Testville".into()),
            interests: vec!["food".into()],
            travel_window: Some("whenever".into()),
            duration_days: Some(6),
            budget_usd: Some(5000.0),
            notes: None,
        }
    }

    /// A valid traveler contact form.
    pub fn sample_form() -> TravelerForm {
        TravelerForm {
            primary_name: "Fran Fixture".into(),
            email: "fran@example.com".into(),
            phone: None,
            preferred_contact: Some("email".into()),
            notes: None,
        }
    }

    /// Create a trip and run it through research and confirmation.
    pub async fn create_confirmed_trip(&self) -> Result<Trip, VoyagioError> {
        let trip = self.workflow.create_trip(Self::sample_intake()).await?;
        let trip = self.workflow.run_research(&trip.id).await?;
        let names = trip
            .research_destinations
            .as_ref()
            .map(|r| r.destination_names())
            .unwrap_or_default();
        self.workflow.confirm_destinations(&trip.id, names).await
    }

    /// Create a trip and advance it through option selection.
    pub async fn create_selected_trip(&self) -> Result<Trip, VoyagioError> {
        let trip = self.create_confirmed_trip().await?;
        self.workflow.generate_options(&trip.id).await?;
        self.workflow.select_option(&trip.id, 0).await
    }
}
