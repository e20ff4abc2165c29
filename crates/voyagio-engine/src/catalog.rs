// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Built-in deterministic planner backed by a curated destination catalog.
//!
//! Used when no external research/planning collaborator is wired in.
//! Determinism is the point: the same intake always produces the same
//! research, options, and itinerary (stable ordering, no randomness),
//! which keeps end-to-end flows reproducible.

use async_trait::async_trait;

use voyagio_core::types::{
    now_iso, DestinationBrief, DestinationResearch, HotelOption, Itinerary, ItineraryDay,
    ItineraryDraft, PlannedOptions, PriceRange, Trip, TripIntake, TripOption,
};
use voyagio_core::{ResearchProvider, TripPlanner, VoyagioError};

struct CatalogEntry {
    name: &'static str,
    country: &'static str,
    summary: &'static str,
    best_season: &'static str,
    highlights: &'static [&'static str],
    /// Interest tags this destination serves, matched against intake.
    tags: &'static [&'static str],
    hotel_name: &'static str,
    hotel_style: &'static str,
    nightly_low: f64,
    nightly_high: f64,
    /// Round-trip airfare per traveler from a major hub.
    airfare_low: f64,
    airfare_high: f64,
}

/// The curated catalog, in presentation order. Order is part of the
/// contract: research falls back to the leading entries when no
/// interest tag matches.
static CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        name: "Lisbon",
        country: "Portugal",
        summary: "Tiled hillside neighborhoods, grilled seafood, and day trips to Sintra's palaces.",
        best_season: "spring",
        highlights: &["Alfama at dusk", "Pastéis de Belém", "Sintra day trip"],
        tags: &["food", "history", "beaches", "city"],
        hotel_name: "Casa do Castelo",
        hotel_style: "boutique",
        nightly_low: 140.0,
        nightly_high: 220.0,
        airfare_low: 450.0,
        airfare_high: 780.0,
    },
    CatalogEntry {
        name: "Rome",
        country: "Italy",
        summary: "Two millennia of empire, basilicas, and trattorie stacked on seven hills.",
        best_season: "autumn",
        highlights: &["Forum and Palatine", "Trastevere dinners", "Vatican museums"],
        tags: &["history", "food", "art", "city"],
        hotel_name: "Albergo Santa Cecilia",
        hotel_style: "boutique",
        nightly_low: 180.0,
        nightly_high: 290.0,
        airfare_low: 520.0,
        airfare_high: 860.0,
    },
    CatalogEntry {
        name: "Kyoto",
        country: "Japan",
        summary: "Temple gardens, kaiseki dining, and machiya lanes best explored on foot.",
        best_season: "spring",
        highlights: &["Fushimi Inari at dawn", "Arashiyama bamboo grove", "Gion tea houses"],
        tags: &["culture", "food", "temples", "gardens"],
        hotel_name: "Yanagi Ryokan",
        hotel_style: "ryokan",
        nightly_low: 210.0,
        nightly_high: 340.0,
        airfare_low: 900.0,
        airfare_high: 1400.0,
    },
    CatalogEntry {
        name: "Marrakesh",
        country: "Morocco",
        summary: "Souks, riads, and the Atlas foothills an hour from the medina.",
        best_season: "spring",
        highlights: &["Jemaa el-Fnaa at night", "Majorelle Garden", "Atlas foothill hike"],
        tags: &["markets", "food", "desert", "culture"],
        hotel_name: "Riad Dar Zitoune",
        hotel_style: "riad",
        nightly_low: 110.0,
        nightly_high: 190.0,
        airfare_low: 600.0,
        airfare_high: 950.0,
    },
    CatalogEntry {
        name: "Reykjavik",
        country: "Iceland",
        summary: "Waterfalls, geothermal lagoons, and the Golden Circle within striking distance.",
        best_season: "summer",
        highlights: &["Golden Circle loop", "Sky Lagoon", "South coast waterfalls"],
        tags: &["nature", "hiking", "hot springs", "adventure"],
        hotel_name: "Harbor Lights Hotel",
        hotel_style: "modern",
        nightly_low: 190.0,
        nightly_high: 310.0,
        airfare_low: 480.0,
        airfare_high: 820.0,
    },
    CatalogEntry {
        name: "Oaxaca",
        country: "Mexico",
        summary: "Mole, mezcal, and Zapotec ruins in a highland colonial city.",
        best_season: "autumn",
        highlights: &["Monte Albán", "Mercado 20 de Noviembre", "Mezcal palenque visit"],
        tags: &["food", "markets", "culture", "ruins"],
        hotel_name: "Casa de las Bugambilias",
        hotel_style: "guesthouse",
        nightly_low: 90.0,
        nightly_high: 160.0,
        airfare_low: 380.0,
        airfare_high: 640.0,
    },
    CatalogEntry {
        name: "Queenstown",
        country: "New Zealand",
        summary: "Alpine lakes, fjord cruises, and every adventure sport invented.",
        best_season: "summer",
        highlights: &["Milford Sound cruise", "Ben Lomond track", "Gibbston wineries"],
        tags: &["adventure", "hiking", "nature", "wine"],
        hotel_name: "Remarkables Lodge",
        hotel_style: "lodge",
        nightly_low: 200.0,
        nightly_high: 330.0,
        airfare_low: 1100.0,
        airfare_high: 1700.0,
    },
    CatalogEntry {
        name: "Hanoi",
        country: "Vietnam",
        summary: "Street food capital with Ha Long Bay and Ninh Binh as overnight side trips.",
        best_season: "autumn",
        highlights: &["Old Quarter food walk", "Ha Long Bay overnight", "Ninh Binh karsts"],
        tags: &["food", "markets", "nature", "city"],
        hotel_name: "Maison d'Orient",
        hotel_style: "boutique",
        nightly_low: 70.0,
        nightly_high: 130.0,
        airfare_low: 850.0,
        airfare_high: 1300.0,
    },
];

const MAX_RESEARCH_RESULTS: usize = 4;
const FALLBACK_RESULTS: usize = 3;
const DEFAULT_DURATION_DAYS: u32 = 7;

/// Airfare for destinations not in the catalog (traveler-supplied names
/// are allowed at confirmation time).
const FALLBACK_AIRFARE: (f64, f64) = (500.0, 900.0);
const FALLBACK_NIGHTLY: (f64, f64) = (120.0, 180.0);

/// Deterministic research and planning from the curated catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct CatalogPlanner;

impl CatalogPlanner {
    pub fn new() -> Self {
        CatalogPlanner
    }

    fn lookup(name: &str) -> Option<&'static CatalogEntry> {
        CATALOG.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Entries matching the intake's interests, best match first.
    ///
    /// Score is the count of intake interests appearing in an entry's
    /// tag list; ties keep catalog order. No match falls back to the
    /// leading catalog entries.
    fn matches(intake: &TripIntake) -> Vec<&'static CatalogEntry> {
        let interests: Vec<String> = intake
            .interests
            .iter()
            .map(|i| i.trim().to_ascii_lowercase())
            .filter(|i| !i.is_empty())
            .collect();

        let mut scored: Vec<(usize, usize, &CatalogEntry)> = CATALOG
            .iter()
            .enumerate()
            .map(|(pos, entry)| {
                let score = interests
                    .iter()
                    .filter(|i| entry.tags.contains(&i.as_str()))
                    .count();
                (score, pos, entry)
            })
            .filter(|(score, _, _)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));

        if scored.is_empty() {
            return CATALOG.iter().take(FALLBACK_RESULTS).collect();
        }
        scored
            .into_iter()
            .take(MAX_RESEARCH_RESULTS)
            .map(|(_, _, e)| e)
            .collect()
    }

    fn hotel_for(destination: &str, nights: u32) -> HotelOption {
        match Self::lookup(destination) {
            Some(entry) => HotelOption {
                name: entry.hotel_name.to_string(),
                destination: entry.name.to_string(),
                nights,
                nightly_low: entry.nightly_low,
                nightly_high: entry.nightly_high,
                style: Some(entry.hotel_style.to_string()),
            },
            None => HotelOption {
                name: format!("{destination} Central Guesthouse"),
                destination: destination.to_string(),
                nights,
                nightly_low: FALLBACK_NIGHTLY.0,
                nightly_high: FALLBACK_NIGHTLY.1,
                style: Some("guesthouse".to_string()),
            },
        }
    }

    /// Whole-party airfare: the primary destination's fare per traveler,
    /// plus a flat per-person hop allowance for each additional stop.
    fn airfare_for(destinations: &[String], party_size: u32) -> PriceRange {
        let (per_low, per_high) = destinations
            .first()
            .and_then(|d| Self::lookup(d))
            .map(|e| (e.airfare_low, e.airfare_high))
            .unwrap_or(FALLBACK_AIRFARE);
        let hops = destinations.len().saturating_sub(1) as f64;
        let party = f64::from(party_size.max(1));
        PriceRange {
            low: (per_low + 60.0 * hops) * party,
            high: (per_high + 110.0 * hops) * party,
        }
    }

    /// Nights per destination: even split of the trip duration, with the
    /// remainder going to the earlier stops.
    fn night_allocation(duration_days: u32, stops: usize) -> Vec<u32> {
        let stops_u32 = stops.max(1) as u32;
        let base = duration_days / stops_u32;
        let extra = duration_days % stops_u32;
        (0..stops_u32)
            .map(|i| base + u32::from(i < extra))
            .collect()
    }

    fn highlights_for(destinations: &[String]) -> Vec<String> {
        destinations
            .iter()
            .filter_map(|d| Self::lookup(d))
            .filter_map(|e| e.highlights.first())
            .map(|h| h.to_string())
            .collect()
    }
}

#[async_trait]
impl ResearchProvider for CatalogPlanner {
    async fn research(&self, intake: &TripIntake) -> Result<DestinationResearch, VoyagioError> {
        let destinations = Self::matches(intake)
            .into_iter()
            .map(|entry| DestinationBrief {
                name: entry.name.to_string(),
                country: entry.country.to_string(),
                summary: entry.summary.to_string(),
                best_season: Some(entry.best_season.to_string()),
                highlights: entry.highlights.iter().map(|h| h.to_string()).collect(),
            })
            .collect();
        Ok(DestinationResearch {
            destinations,
            generated_at: now_iso(),
        })
    }
}

#[async_trait]
impl TripPlanner for CatalogPlanner {
    async fn plan_options(&self, trip: &Trip) -> Result<PlannedOptions, VoyagioError> {
        let destinations = &trip.confirmed_destinations;
        if destinations.is_empty() {
            return Err(VoyagioError::Planner {
                message: "cannot plan options without confirmed destinations".into(),
                source: None,
            });
        }

        let duration = trip.intake.duration_days.unwrap_or(DEFAULT_DURATION_DAYS);
        let nights = Self::night_allocation(duration, destinations.len());
        let route = destinations.join(" & ");

        let mut options = vec![TripOption {
            title: format!("Classic Route: {route}"),
            summary: format!(
                "A balanced {duration}-day circuit through {route}, mixing the signature sights with unscheduled afternoons."
            ),
            destinations: destinations.clone(),
            pace: Some("balanced".into()),
            highlights: Self::highlights_for(destinations),
        }];

        let first = &destinations[0];
        options.push(TripOption {
            title: format!("Slow Stay: {first}"),
            summary: format!(
                "All {duration} days based in {first}: one unpacking, deep neighborhood time, and day trips as the mood strikes."
            ),
            destinations: vec![first.clone()],
            pace: Some("relaxed".into()),
            highlights: Self::highlights_for(&destinations[..1]),
        });

        if destinations.len() >= 2 {
            options.push(TripOption {
                title: format!("Whirlwind: {route}"),
                summary: format!(
                    "{route} in {duration} packed days: early starts, pre-booked tickets, and no stop longer than it needs."
                ),
                destinations: destinations.clone(),
                pace: Some("packed".into()),
                highlights: Self::highlights_for(destinations),
            });
        }

        let hotels_shown = destinations
            .iter()
            .zip(&nights)
            .map(|(d, n)| Self::hotel_for(d, *n))
            .collect();
        let airfare_estimate =
            Some(Self::airfare_for(destinations, trip.intake.party_size()));

        Ok(PlannedOptions {
            options,
            hotels_shown,
            airfare_estimate,
        })
    }

    async fn build_itinerary(
        &self,
        trip: &Trip,
        option_index: usize,
    ) -> Result<ItineraryDraft, VoyagioError> {
        let option = trip
            .options
            .as_ref()
            .and_then(|o| o.get(option_index))
            .ok_or_else(|| VoyagioError::Planner {
                message: format!("no stored option at index {option_index}"),
                source: None,
            })?;

        let duration = trip.intake.duration_days.unwrap_or(DEFAULT_DURATION_DAYS);
        let nights = Self::night_allocation(duration, option.destinations.len());
        let hotels_selected: Vec<HotelOption> = option
            .destinations
            .iter()
            .zip(&nights)
            .map(|(d, n)| Self::hotel_for(d, *n))
            .collect();

        // Assign each day to a stop per the night allocation, then pull
        // activities from the stop's highlight list in rotation.
        let mut days = Vec::with_capacity(duration as usize);
        let mut day_number = 1u32;
        for (stop_index, destination) in option.destinations.iter().enumerate() {
            let highlights = Self::lookup(destination)
                .map(|e| e.highlights)
                .unwrap_or(&["Local exploration"]);
            let lodging = hotels_selected.get(stop_index).map(|h| h.name.clone());
            for local_day in 0..nights[stop_index] {
                let title = if local_day == 0 && stop_index == 0 {
                    format!("Arrive in {destination}")
                } else if local_day == 0 {
                    format!("Travel to {destination}")
                } else {
                    format!("{destination}, day {}", local_day + 1)
                };
                let activity = highlights[local_day as usize % highlights.len()].to_string();
                days.push(ItineraryDay {
                    day: day_number,
                    title,
                    location: destination.clone(),
                    activities: vec![activity],
                    lodging: lodging.clone(),
                });
                day_number += 1;
            }
        }

        Ok(ItineraryDraft {
            itinerary: Itinerary {
                days,
                generated_at: now_iso(),
            },
            hotels_selected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{confirmed_trip, sample_intake};

    #[tokio::test]
    async fn research_is_deterministic() {
        let planner = CatalogPlanner::new();
        let intake = sample_intake();
        let a = planner.research(&intake).await.unwrap();
        let b = planner.research(&intake).await.unwrap();
        assert_eq!(a.destinations, b.destinations);
        assert!(!a.destinations.is_empty());
        assert!(a.destinations.len() <= MAX_RESEARCH_RESULTS);
    }

    #[tokio::test]
    async fn research_ranks_by_interest_overlap() {
        let planner = CatalogPlanner::new();
        let mut intake = sample_intake();
        intake.interests = vec!["hiking".into(), "nature".into(), "adventure".into()];
        let research = planner.research(&intake).await.unwrap();
        let names: Vec<&str> = research
            .destinations
            .iter()
            .map(|d| d.name.as_str())
            .collect();
        // Reykjavik and Queenstown each match three tags and outrank
        // single-tag entries; catalog order breaks the tie.
        assert_eq!(names[0], "Reykjavik");
        assert_eq!(names[1], "Queenstown");
    }

    #[tokio::test]
    async fn research_with_no_matches_falls_back_to_catalog_head() {
        let planner = CatalogPlanner::new();
        let mut intake = sample_intake();
        intake.interests = vec!["spelunking".into()];
        let research = planner.research(&intake).await.unwrap();
        assert_eq!(research.destinations.len(), FALLBACK_RESULTS);
        assert_eq!(research.destinations[0].name, "Lisbon");
    }

    #[tokio::test]
    async fn options_cover_confirmed_destinations() {
        let planner = CatalogPlanner::new();
        let trip = confirmed_trip("t-c1");
        let planned = planner.plan_options(&trip).await.unwrap();

        assert_eq!(planned.options.len(), 3);
        assert_eq!(
            planned.options[0].destinations,
            trip.confirmed_destinations
        );
        assert_eq!(planned.options[1].destinations.len(), 1);
        assert_eq!(planned.hotels_shown.len(), trip.confirmed_destinations.len());
        assert!(planned.airfare_estimate.is_some());

        // Nights across the shortlist account for the full duration.
        let total_nights: u32 = planned.hotels_shown.iter().map(|h| h.nights).sum();
        assert_eq!(total_nights, trip.intake.duration_days.unwrap());
    }

    #[tokio::test]
    async fn single_destination_trip_gets_two_options() {
        let planner = CatalogPlanner::new();
        let mut trip = confirmed_trip("t-c2");
        trip.confirmed_destinations = vec!["Kyoto".into()];
        let planned = planner.plan_options(&trip).await.unwrap();
        assert_eq!(planned.options.len(), 2);
    }

    #[tokio::test]
    async fn unknown_destination_gets_fallback_pricing() {
        let planner = CatalogPlanner::new();
        let mut trip = confirmed_trip("t-c3");
        trip.confirmed_destinations = vec!["Atlantis".into()];
        let planned = planner.plan_options(&trip).await.unwrap();
        let hotel = &planned.hotels_shown[0];
        assert!(hotel.name.contains("Atlantis"));
        assert_eq!(hotel.nightly_low, FALLBACK_NIGHTLY.0);
    }

    #[tokio::test]
    async fn itinerary_fills_every_day_in_order() {
        let planner = CatalogPlanner::new();
        let mut trip = confirmed_trip("t-c4");
        let planned = planner.plan_options(&trip).await.unwrap();
        trip.options = Some(planned.options);

        let draft = planner.build_itinerary(&trip, 0).await.unwrap();
        let days = &draft.itinerary.days;
        assert_eq!(days.len() as u32, trip.intake.duration_days.unwrap());
        for (i, day) in days.iter().enumerate() {
            assert_eq!(day.day, i as u32 + 1);
            assert!(day.lodging.is_some());
        }
        assert_eq!(days[0].title, "Arrive in Lisbon");
        assert_eq!(draft.hotels_selected.len(), 2);
    }

    #[tokio::test]
    async fn itinerary_rejects_missing_option_index() {
        let planner = CatalogPlanner::new();
        let trip = confirmed_trip("t-c5");
        let err = planner.build_itinerary(&trip, 0).await.unwrap_err();
        assert!(matches!(err, VoyagioError::Planner { .. }));
    }
}
