// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the TripStore trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use voyagio_config::model::StorageConfig;
use voyagio_core::types::{
    DestinationResearch, HandoffDocument, Itinerary, Trip, TripOption, TripProgress, TripStatus,
    VariantData,
};
use voyagio_core::{TripStore, VoyagioError};

use crate::database::Database;
use crate::queries;

/// SQLite-backed trip store.
///
/// Wraps a [`Database`] handle and delegates all query operations to the
/// typed query module. The database is lazily opened on the first call to
/// [`TripStore::initialize`].
pub struct SqliteTripStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteTripStore {
    /// Create a new SqliteTripStore with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`] is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, VoyagioError> {
        self.db.get().ok_or_else(|| VoyagioError::Storage {
            source: "store not initialized -- call initialize() first".into(),
        })
    }

    /// Liveness probe: runs a trivial statement against the connection.
    pub async fn health_check(&self) -> Result<(), VoyagioError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        Ok(())
    }
}

#[async_trait]
impl TripStore for SqliteTripStore {
    async fn initialize(&self) -> Result<(), VoyagioError> {
        let db = Database::open_with(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| VoyagioError::Storage {
            source: "store already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite trip store initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), VoyagioError> {
        // Checkpoint WAL; the connection itself is dropped with the store.
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(crate::database::map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn create_trip(&self, trip: &Trip) -> Result<(), VoyagioError> {
        queries::trips::create_trip(self.db()?, trip).await
    }

    async fn get_trip(&self, trip_id: &str) -> Result<Option<Trip>, VoyagioError> {
        queries::trips::get_trip(self.db()?, trip_id).await
    }

    async fn list_trips(&self, status: Option<TripStatus>) -> Result<Vec<Trip>, VoyagioError> {
        queries::trips::list_trips(self.db()?, status).await
    }

    async fn set_research(
        &self,
        trip_id: &str,
        research: &DestinationResearch,
    ) -> Result<bool, VoyagioError> {
        queries::trips::set_research(self.db()?, trip_id, research).await
    }

    async fn confirm_destinations(
        &self,
        trip_id: &str,
        destinations: &[String],
    ) -> Result<bool, VoyagioError> {
        queries::trips::confirm_destinations(self.db()?, trip_id, destinations).await
    }

    async fn set_options(
        &self,
        trip_id: &str,
        options: &[TripOption],
    ) -> Result<bool, VoyagioError> {
        queries::trips::set_options(self.db()?, trip_id, options).await
    }

    async fn select_option(&self, trip_id: &str, index: usize) -> Result<bool, VoyagioError> {
        queries::trips::select_option(self.db()?, trip_id, index).await
    }

    async fn set_itinerary(
        &self,
        trip_id: &str,
        itinerary: &Itinerary,
    ) -> Result<bool, VoyagioError> {
        queries::trips::set_itinerary(self.db()?, trip_id, itinerary).await
    }

    async fn set_variants(
        &self,
        trip_id: &str,
        variants: &VariantData,
    ) -> Result<bool, VoyagioError> {
        queries::trips::set_variants(self.db()?, trip_id, variants).await
    }

    async fn set_progress(
        &self,
        trip_id: &str,
        progress: &TripProgress,
    ) -> Result<bool, VoyagioError> {
        queries::trips::set_progress(self.db()?, trip_id, progress).await
    }

    async fn write_handoff(
        &self,
        trip_id: &str,
        payload: &HandoffDocument,
    ) -> Result<bool, VoyagioError> {
        queries::trips::write_handoff(self.db()?, trip_id, payload).await
    }

    async fn mark_booked(&self, trip_id: &str) -> Result<bool, VoyagioError> {
        queries::trips::mark_booked(self.db()?, trip_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use voyagio_core::types::{now_iso, TripIntake};

    fn make_config(path: &str) -> StorageConfig {
        StorageConfig {
            database_path: path.to_string(),
            wal_mode: true,
        }
    }

    fn sample_trip(id: &str) -> Trip {
        Trip {
            id: id.to_string(),
            status: TripStatus::Active,
            intake: TripIntake {
                surnames: vec!["Marchetti".into()],
                party_adults: 2,
                party_children: 0,
                origin: Some("Boston".into()),
                interests: vec!["food".into()],
                travel_window: None,
                duration_days: Some(7),
                budget_usd: None,
                notes: None,
            },
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

    #[tokio::test]
    async fn initialize_opens_database_at_configured_path() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("init_test.db");
        let store = SqliteTripStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert!(db_path.exists(), "database file should be created");
    }

    #[tokio::test]
    async fn initialize_twice_returns_error() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("double_init.db");
        let store = SqliteTripStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        assert!(store.initialize().await.is_err(), "second initialize should fail");
    }

    #[tokio::test]
    async fn operations_fail_before_initialize() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("no_init.db");
        let store = SqliteTripStore::new(make_config(db_path.to_str().unwrap()));

        assert!(store.health_check().await.is_err());
        assert!(store.get_trip("t-1").await.is_err());
    }

    #[tokio::test]
    async fn health_check_after_initialize() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("health.db");
        let store = SqliteTripStore::new(make_config(db_path.to_str().unwrap()));

        store.initialize().await.unwrap();
        store.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn full_trip_lifecycle_through_adapter() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("lifecycle.db");
        let store = SqliteTripStore::new(make_config(db_path.to_str().unwrap()));
        store.initialize().await.unwrap();

        store.create_trip(&sample_trip("t-adapter-1")).await.unwrap();

        let trip = store.get_trip("t-adapter-1").await.unwrap().unwrap();
        assert_eq!(trip.id, "t-adapter-1");
        assert!(!trip.destinations_confirmed);

        let research = DestinationResearch {
            destinations: vec![],
            generated_at: now_iso(),
        };
        assert!(store.set_research("t-adapter-1", &research).await.unwrap());
        assert!(
            store
                .confirm_destinations("t-adapter-1", &["Rome".into()])
                .await
                .unwrap()
        );

        // Second confirmation is refused by the guarded write.
        assert!(
            !store
                .confirm_destinations("t-adapter-1", &["Paris".into()])
                .await
                .unwrap()
        );

        let trips = store.list_trips(Some(TripStatus::Active)).await.unwrap();
        assert_eq!(trips.len(), 1);
        assert_eq!(trips[0].confirmed_destinations, vec!["Rome".to_string()]);

        store.close().await.unwrap();
    }
}
