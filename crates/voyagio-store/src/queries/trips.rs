// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trip CRUD and guarded workflow updates.
//!
//! Guarded writes express their precondition in the UPDATE's WHERE clause
//! and report back whether a row changed. A `false` from one of them means
//! the precondition did not hold at write time, regardless of what any
//! earlier read suggested. Callers re-read the row to classify the refusal.

use std::str::FromStr;

use rusqlite::params;
use voyagio_core::VoyagioError;

use crate::database::{map_tr_err, Database};
use crate::models::{
    DestinationResearch, HandoffDocument, Itinerary, Trip, TripIntake, TripOption, TripProgress,
    TripStatus, VariantData,
};

const TRIP_COLUMNS: &str = "id, status, intake, research, destinations_confirmed, \
     confirmed_destinations, options, selected_option_index, itinerary, variants, \
     handoff, progress, created_at, updated_at";

/// Serialize a domain value to its JSON column representation.
fn encode<T: serde::Serialize>(value: &T) -> Result<String, VoyagioError> {
    serde_json::to_string(value).map_err(|e| VoyagioError::Storage {
        source: Box::new(e),
    })
}

/// Deserialize a JSON column, reporting the column index on failure.
fn decode<T: serde::de::DeserializeOwned>(idx: usize, raw: &str) -> Result<T, rusqlite::Error> {
    serde_json::from_str(raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Hydrate a full trip from a row selected with [`TRIP_COLUMNS`].
fn row_to_trip(row: &rusqlite::Row<'_>) -> Result<Trip, rusqlite::Error> {
    let status_raw: String = row.get(1)?;
    let status = TripStatus::from_str(&status_raw).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let intake_raw: String = row.get(2)?;
    let intake: TripIntake = decode(2, &intake_raw)?;

    let research_raw: Option<String> = row.get(3)?;
    let research_destinations: Option<DestinationResearch> = match research_raw {
        Some(raw) => Some(decode(3, &raw)?),
        None => None,
    };

    let confirmed_raw: String = row.get(5)?;
    let confirmed_destinations: Vec<String> = decode(5, &confirmed_raw)?;

    let options_raw: Option<String> = row.get(6)?;
    let options: Option<Vec<TripOption>> = match options_raw {
        Some(raw) => Some(decode(6, &raw)?),
        None => None,
    };

    let selected_raw: Option<i64> = row.get(7)?;

    let itinerary_raw: Option<String> = row.get(8)?;
    let itinerary: Option<Itinerary> = match itinerary_raw {
        Some(raw) => Some(decode(8, &raw)?),
        None => None,
    };

    let variants_raw: String = row.get(9)?;
    let variants: VariantData = decode(9, &variants_raw)?;

    let handoff_raw: Option<String> = row.get(10)?;
    let handoff_payload: Option<HandoffDocument> = match handoff_raw {
        Some(raw) => Some(decode(10, &raw)?),
        None => None,
    };

    let progress_raw: String = row.get(11)?;
    let progress: TripProgress = decode(11, &progress_raw)?;

    Ok(Trip {
        id: row.get(0)?,
        status,
        intake,
        research_destinations,
        destinations_confirmed: row.get(4)?,
        confirmed_destinations,
        options,
        selected_option_index: selected_raw.map(|i| i as usize),
        itinerary,
        variants,
        handoff_payload,
        progress,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

/// Insert a new trip. Fails if the id already exists.
pub async fn create_trip(db: &Database, trip: &Trip) -> Result<(), VoyagioError> {
    let id = trip.id.clone();
    let status = trip.status.to_string();
    let intake = encode(&trip.intake)?;
    let research = match &trip.research_destinations {
        Some(r) => Some(encode(r)?),
        None => None,
    };
    let confirmed = encode(&trip.confirmed_destinations)?;
    let options = match &trip.options {
        Some(o) => Some(encode(o)?),
        None => None,
    };
    let options_count = trip.options.as_ref().map_or(0, |o| o.len() as i64);
    let selected = trip.selected_option_index.map(|i| i as i64);
    let itinerary = match &trip.itinerary {
        Some(i) => Some(encode(i)?),
        None => None,
    };
    let variants = encode(&trip.variants)?;
    let handoff = match &trip.handoff_payload {
        Some(h) => Some(encode(h)?),
        None => None,
    };
    let progress = encode(&trip.progress)?;
    let created_at = trip.created_at.clone();
    let updated_at = trip.updated_at.clone();

    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO trips (id, status, intake, research, destinations_confirmed, \
                 confirmed_destinations, options, options_count, selected_option_index, \
                 itinerary, variants, handoff, progress, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    id,
                    status,
                    intake,
                    research,
                    false,
                    confirmed,
                    options,
                    options_count,
                    selected,
                    itinerary,
                    variants,
                    handoff,
                    progress,
                    created_at,
                    updated_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Get a trip by id.
pub async fn get_trip(db: &Database, id: &str) -> Result<Option<Trip>, VoyagioError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?1"))?;
            let result = stmt.query_row(params![id], row_to_trip);
            match result {
                Ok(trip) => Ok(Some(trip)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
        .await
        .map_err(map_tr_err)
}

/// List trips, optionally filtered by status, most recently updated first.
pub async fn list_trips(
    db: &Database,
    status: Option<TripStatus>,
) -> Result<Vec<Trip>, VoyagioError> {
    let status = status.map(|s| s.to_string());
    db.connection()
        .call(move |conn| {
            let mut trips = Vec::new();
            match &status {
                Some(status_filter) => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {TRIP_COLUMNS} FROM trips WHERE status = ?1 \
                         ORDER BY updated_at DESC, id ASC"
                    ))?;
                    let rows = stmt.query_map(params![status_filter], row_to_trip)?;
                    for row in rows {
                        trips.push(row?);
                    }
                }
                None => {
                    let mut stmt = conn.prepare(&format!(
                        "SELECT {TRIP_COLUMNS} FROM trips ORDER BY updated_at DESC, id ASC"
                    ))?;
                    let rows = stmt.query_map([], row_to_trip)?;
                    for row in rows {
                        trips.push(row?);
                    }
                }
            }
            Ok(trips)
        })
        .await
        .map_err(map_tr_err)
}

/// Replace the research output while the trip is still unconfirmed.
pub async fn set_research(
    db: &Database,
    id: &str,
    research: &DestinationResearch,
) -> Result<bool, VoyagioError> {
    let id = id.to_string();
    let research = encode(research)?;
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE trips SET research = ?1, \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2 AND destinations_confirmed = 0",
                params![research, id],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Flip the one-way confirmation flag and record the chosen destinations.
///
/// The WHERE clause is the authority on the one-way rule: a concurrent
/// confirmation or missing research makes this a no-op.
pub async fn confirm_destinations(
    db: &Database,
    id: &str,
    destinations: &[String],
) -> Result<bool, VoyagioError> {
    let id = id.to_string();
    let destinations = encode(&destinations)?;
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE trips SET destinations_confirmed = 1, confirmed_destinations = ?1, \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2 AND destinations_confirmed = 0 AND research IS NOT NULL",
                params![destinations, id],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Replace the generated options for a confirmed, not-yet-selected trip.
///
/// `options_count` is stored alongside so that a later `select_option`
/// can bounds-check against the set it actually races with.
pub async fn set_options(
    db: &Database,
    id: &str,
    options: &[TripOption],
) -> Result<bool, VoyagioError> {
    let id = id.to_string();
    let count = options.len() as i64;
    let options = encode(&options)?;
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE trips SET options = ?1, options_count = ?2, \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?3 AND destinations_confirmed = 1 \
                 AND selected_option_index IS NULL",
                params![options, count, id],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Record the write-once option selection.
///
/// Bounds are checked against the stored `options_count` inside the same
/// statement, so a racing regeneration cannot let an index slip past the
/// set it applies to.
pub async fn select_option(db: &Database, id: &str, index: usize) -> Result<bool, VoyagioError> {
    let id = id.to_string();
    let index = index as i64;
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE trips SET selected_option_index = ?1, \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2 AND options IS NOT NULL \
                 AND selected_option_index IS NULL AND ?1 < options_count",
                params![index, id],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Replace the itinerary for a trip with a committed selection.
pub async fn set_itinerary(
    db: &Database,
    id: &str,
    itinerary: &Itinerary,
) -> Result<bool, VoyagioError> {
    let id = id.to_string();
    let itinerary = encode(itinerary)?;
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE trips SET itinerary = ?1, \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2 AND selected_option_index IS NOT NULL",
                params![itinerary, id],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Replace the variant-data bag.
pub async fn set_variants(
    db: &Database,
    id: &str,
    variants: &VariantData,
) -> Result<bool, VoyagioError> {
    let id = id.to_string();
    let variants = encode(variants)?;
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE trips SET variants = ?1, \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2",
                params![variants, id],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Overwrite the volatile progress snapshot.
pub async fn set_progress(
    db: &Database,
    id: &str,
    progress: &TripProgress,
) -> Result<bool, VoyagioError> {
    let id = id.to_string();
    let progress = encode(progress)?;
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE trips SET progress = ?1, \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2",
                params![progress, id],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Write the handoff payload and advance status to `quote_requested`,
/// both in one statement. Exactly one such write can ever land.
pub async fn write_handoff(
    db: &Database,
    id: &str,
    payload: &HandoffDocument,
) -> Result<bool, VoyagioError> {
    let id = id.to_string();
    let payload = encode(payload)?;
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE trips SET handoff = ?1, status = 'quote_requested', \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?2 AND status = 'active' AND handoff IS NULL",
                params![payload, id],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

/// Advance status `quote_requested` -> `booked`.
pub async fn mark_booked(db: &Database, id: &str) -> Result<bool, VoyagioError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| {
            let n = conn.execute(
                "UPDATE trips SET status = 'booked', \
                 updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                 WHERE id = ?1 AND status = 'quote_requested'",
                params![id],
            )?;
            Ok(n > 0)
        })
        .await
        .map_err(map_tr_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use voyagio_core::types::{DestinationBrief, ItineraryDay};

    async fn setup_db() -> (Database, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
        (db, dir)
    }

    fn make_trip(id: &str) -> Trip {
        Trip {
            id: id.to_string(),
            status: TripStatus::Active,
            intake: TripIntake {
                surnames: vec!["Okafor".to_string()],
                party_adults: 2,
                party_children: 0,
                origin: Some("Chicago".to_string()),
                interests: vec!["food".to_string()],
                travel_window: Some("early June".to_string()),
                duration_days: Some(7),
                budget_usd: Some(6000.0),
                notes: None,
            },
            research_destinations: None,
            destinations_confirmed: false,
            confirmed_destinations: Vec::new(),
            options: None,
            selected_option_index: None,
            itinerary: None,
            variants: VariantData::default(),
            handoff_payload: None,
            progress: TripProgress {
                step: "intake".to_string(),
                message: "trip created".to_string(),
                percent: 10,
            },
            created_at: "2026-05-01T08:00:00.000Z".to_string(),
            updated_at: "2026-05-01T08:00:00.000Z".to_string(),
        }
    }

    fn make_research() -> DestinationResearch {
        DestinationResearch {
            destinations: vec![
                DestinationBrief {
                    name: "Lisbon".to_string(),
                    country: "Portugal".to_string(),
                    summary: "Tiled hills, pastel light, custard tarts.".to_string(),
                    best_season: Some("May-June".to_string()),
                    highlights: vec!["Alfama".to_string()],
                },
                DestinationBrief {
                    name: "Porto".to_string(),
                    country: "Portugal".to_string(),
                    summary: "River city with cellars and bridges.".to_string(),
                    best_season: None,
                    highlights: Vec::new(),
                },
            ],
            generated_at: "2026-05-01T08:01:00.000Z".to_string(),
        }
    }

    fn make_options() -> Vec<TripOption> {
        vec![
            TripOption {
                title: "Classic Lisbon".to_string(),
                summary: "Seven days in the capital.".to_string(),
                destinations: vec!["Lisbon".to_string()],
                pace: Some("relaxed".to_string()),
                highlights: vec!["Tram 28".to_string()],
            },
            TripOption {
                title: "Two Cities".to_string(),
                summary: "Lisbon and Porto split.".to_string(),
                destinations: vec!["Lisbon".to_string(), "Porto".to_string()],
                pace: Some("balanced".to_string()),
                highlights: Vec::new(),
            },
        ]
    }

    /// Drive a fresh trip up to the confirmed-with-options state.
    async fn trip_with_options(db: &Database, id: &str) -> Vec<TripOption> {
        create_trip(db, &make_trip(id)).await.unwrap();
        assert!(set_research(db, id, &make_research()).await.unwrap());
        assert!(confirm_destinations(db, id, &["Lisbon".to_string()])
            .await
            .unwrap());
        let options = make_options();
        assert!(set_options(db, id, &options).await.unwrap());
        options
    }

    #[tokio::test]
    async fn create_and_get_trip_roundtrips() {
        let (db, _dir) = setup_db().await;
        let trip = make_trip("trip-1");

        create_trip(&db, &trip).await.unwrap();
        let retrieved = get_trip(&db, "trip-1").await.unwrap();
        assert!(retrieved.is_some());
        let retrieved = retrieved.unwrap();
        assert_eq!(retrieved.id, "trip-1");
        assert_eq!(retrieved.status, TripStatus::Active);
        assert_eq!(retrieved.intake.surnames, vec!["Okafor"]);
        assert_eq!(retrieved.intake.budget_usd, Some(6000.0));
        assert!(!retrieved.destinations_confirmed);
        assert!(retrieved.options.is_none());
        assert_eq!(retrieved.progress.percent, 10);

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn get_nonexistent_trip_returns_none() {
        let (db, _dir) = setup_db().await;
        let result = get_trip(&db, "no-such-trip").await.unwrap();
        assert!(result.is_none());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn duplicate_trip_id_is_rejected() {
        let (db, _dir) = setup_db().await;
        create_trip(&db, &make_trip("dup")).await.unwrap();
        let result = create_trip(&db, &make_trip("dup")).await;
        assert!(result.is_err());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn list_trips_filters_by_status() {
        let (db, _dir) = setup_db().await;
        let _options = trip_with_options(&db, "t-quote").await;
        assert!(select_option(&db, "t-quote", 0).await.unwrap());
        create_trip(&db, &make_trip("t-active")).await.unwrap();

        let handoff = sample_handoff("t-quote");
        assert!(write_handoff(&db, "t-quote", &handoff).await.unwrap());

        let all = list_trips(&db, None).await.unwrap();
        assert_eq!(all.len(), 2);

        let active = list_trips(&db, Some(TripStatus::Active)).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "t-active");

        let quoted = list_trips(&db, Some(TripStatus::QuoteRequested))
            .await
            .unwrap();
        assert_eq!(quoted.len(), 1);
        assert_eq!(quoted[0].id, "t-quote");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn research_replaceable_until_confirmation() {
        let (db, _dir) = setup_db().await;
        create_trip(&db, &make_trip("t-res")).await.unwrap();

        assert!(set_research(&db, "t-res", &make_research()).await.unwrap());
        // Replacing before confirmation is allowed.
        assert!(set_research(&db, "t-res", &make_research()).await.unwrap());

        assert!(confirm_destinations(&db, "t-res", &["Lisbon".to_string()])
            .await
            .unwrap());

        // Once confirmed, the research set is frozen.
        assert!(!set_research(&db, "t-res", &make_research()).await.unwrap());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn confirm_requires_research_and_is_one_way() {
        let (db, _dir) = setup_db().await;
        create_trip(&db, &make_trip("t-conf")).await.unwrap();

        // No research yet: refused.
        assert!(!confirm_destinations(&db, "t-conf", &["Lisbon".to_string()])
            .await
            .unwrap());

        assert!(set_research(&db, "t-conf", &make_research()).await.unwrap());
        assert!(confirm_destinations(&db, "t-conf", &["Porto".to_string()])
            .await
            .unwrap());

        // Second confirmation is a no-op.
        assert!(!confirm_destinations(&db, "t-conf", &["Lisbon".to_string()])
            .await
            .unwrap());

        let trip = get_trip(&db, "t-conf").await.unwrap().unwrap();
        assert!(trip.destinations_confirmed);
        assert_eq!(trip.confirmed_destinations, vec!["Porto"]);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn set_options_requires_confirmation() {
        let (db, _dir) = setup_db().await;
        create_trip(&db, &make_trip("t-opt")).await.unwrap();

        assert!(!set_options(&db, "t-opt", &make_options()).await.unwrap());

        assert!(set_research(&db, "t-opt", &make_research()).await.unwrap());
        assert!(confirm_destinations(&db, "t-opt", &["Lisbon".to_string()])
            .await
            .unwrap());
        assert!(set_options(&db, "t-opt", &make_options()).await.unwrap());

        let trip = get_trip(&db, "t-opt").await.unwrap().unwrap();
        assert_eq!(trip.options.unwrap().len(), 2);
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn regeneration_refused_after_selection() {
        let (db, _dir) = setup_db().await;
        let _options = trip_with_options(&db, "t-regen").await;
        assert!(select_option(&db, "t-regen", 1).await.unwrap());

        assert!(!set_options(&db, "t-regen", &make_options()[..1])
            .await
            .unwrap());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn select_option_is_write_once_and_bounds_checked() {
        let (db, _dir) = setup_db().await;
        create_trip(&db, &make_trip("t-sel")).await.unwrap();

        // No options yet: refused.
        assert!(!select_option(&db, "t-sel", 0).await.unwrap());

        assert!(set_research(&db, "t-sel", &make_research()).await.unwrap());
        assert!(confirm_destinations(&db, "t-sel", &["Lisbon".to_string()])
            .await
            .unwrap());
        assert!(set_options(&db, "t-sel", &make_options()).await.unwrap());

        // Out of range against the stored count.
        assert!(!select_option(&db, "t-sel", 2).await.unwrap());

        assert!(select_option(&db, "t-sel", 1).await.unwrap());
        // First selection wins.
        assert!(!select_option(&db, "t-sel", 0).await.unwrap());

        let trip = get_trip(&db, "t-sel").await.unwrap().unwrap();
        assert_eq!(trip.selected_option_index, Some(1));
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn concurrent_selects_commit_exactly_one() {
        let (db, _dir) = setup_db().await;
        let _options = trip_with_options(&db, "t-race").await;

        let mut handles = Vec::new();
        for i in 0..8 {
            let conn = db.connection().clone();
            handles.push(tokio::spawn(async move {
                let index = (i % 2) as i64;
                conn.call(move |conn| -> Result<bool, rusqlite::Error> {
                    let n = conn.execute(
                        "UPDATE trips SET selected_option_index = ?1, \
                         updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')
                         WHERE id = ?2 AND options IS NOT NULL \
                         AND selected_option_index IS NULL AND ?1 < options_count",
                        params![index, "t-race"],
                    )?;
                    Ok(n > 0)
                })
                .await
            }));
        }

        let mut wins = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1, "exactly one concurrent selection may land");

        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn itinerary_requires_selection() {
        let (db, _dir) = setup_db().await;
        let _options = trip_with_options(&db, "t-itin").await;

        let itinerary = Itinerary {
            days: vec![ItineraryDay {
                day: 1,
                title: "Arrival".to_string(),
                location: "Lisbon".to_string(),
                activities: vec!["Check in".to_string()],
                lodging: Some("Hotel Azul".to_string()),
            }],
            generated_at: "2026-05-01T09:00:00.000Z".to_string(),
        };

        assert!(!set_itinerary(&db, "t-itin", &itinerary).await.unwrap());

        assert!(select_option(&db, "t-itin", 0).await.unwrap());
        assert!(set_itinerary(&db, "t-itin", &itinerary).await.unwrap());

        let trip = get_trip(&db, "t-itin").await.unwrap().unwrap();
        assert_eq!(trip.itinerary.unwrap().days.len(), 1);
        db.close().await.unwrap();
    }

    fn sample_handoff(trip_id: &str) -> HandoffDocument {
        HandoffDocument {
            trip_id: trip_id.to_string(),
            generated_at: "2026-05-02T10:00:00.000Z".to_string(),
            trip_created_at: "2026-05-01T08:00:00.000Z".to_string(),
            status: TripStatus::QuoteRequested,
            intake: make_trip(trip_id).intake,
            traveler_contact: None,
            confirmed_destinations: vec!["Lisbon".to_string()],
            selected_option: None,
            itinerary: None,
            hotels_shown: Vec::new(),
            hotels_selected: Vec::new(),
            airfare_estimate: None,
            cost_estimate: None,
        }
    }

    #[tokio::test]
    async fn write_handoff_is_atomic_and_single_shot() {
        let (db, _dir) = setup_db().await;
        let _options = trip_with_options(&db, "t-hand").await;
        assert!(select_option(&db, "t-hand", 0).await.unwrap());

        let handoff = sample_handoff("t-hand");
        assert!(write_handoff(&db, "t-hand", &handoff).await.unwrap());

        let trip = get_trip(&db, "t-hand").await.unwrap().unwrap();
        assert_eq!(trip.status, TripStatus::QuoteRequested);
        assert!(trip.handoff_payload.is_some());

        // A second request hits the status + payload guard.
        assert!(!write_handoff(&db, "t-hand", &handoff).await.unwrap());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn mark_booked_only_from_quote_requested() {
        let (db, _dir) = setup_db().await;
        create_trip(&db, &make_trip("t-book")).await.unwrap();

        // Still active: refused.
        assert!(!mark_booked(&db, "t-book").await.unwrap());

        let _options = trip_with_options(&db, "t-book2").await;
        assert!(select_option(&db, "t-book2", 0).await.unwrap());
        assert!(write_handoff(&db, "t-book2", &sample_handoff("t-book2"))
            .await
            .unwrap());

        assert!(mark_booked(&db, "t-book2").await.unwrap());
        let trip = get_trip(&db, "t-book2").await.unwrap().unwrap();
        assert_eq!(trip.status, TripStatus::Booked);

        // Booked is terminal for this call.
        assert!(!mark_booked(&db, "t-book2").await.unwrap());
        db.close().await.unwrap();
    }

    #[tokio::test]
    async fn progress_and_variants_report_missing_trip() {
        let (db, _dir) = setup_db().await;

        let progress = TripProgress {
            step: "research".to_string(),
            message: "researching destinations".to_string(),
            percent: 40,
        };
        assert!(!set_progress(&db, "ghost", &progress).await.unwrap());
        assert!(!set_variants(&db, "ghost", &VariantData::default())
            .await
            .unwrap());

        create_trip(&db, &make_trip("t-prog")).await.unwrap();
        assert!(set_progress(&db, "t-prog", &progress).await.unwrap());

        let trip = get_trip(&db, "t-prog").await.unwrap().unwrap();
        assert_eq!(trip.progress.step, "research");
        assert_eq!(trip.progress.percent, 40);
        db.close().await.unwrap();
    }
}
