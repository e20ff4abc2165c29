// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Queue-backed planner mocks for deterministic testing.
//!
//! Responses are popped from FIFO queues. When a queue is empty, a
//! small built-in default is returned so simple tests need no setup;
//! failure injection pushes an error onto the queue instead.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use voyagio_core::types::{
    now_iso, DestinationBrief, DestinationResearch, HotelOption, Itinerary, ItineraryDay,
    ItineraryDraft, PlannedOptions, PriceRange, Trip, TripIntake, TripOption,
};
use voyagio_core::{ResearchProvider, TripPlanner, VoyagioError};

type Scripted<T> = Arc<Mutex<VecDeque<Result<T, String>>>>;

fn planner_err(message: String) -> VoyagioError {
    VoyagioError::Planner {
        message,
        source: None,
    }
}

/// A mock research provider returning pre-scripted research bundles.
#[derive(Default)]
pub struct ScriptedResearch {
    queue: Scripted<DestinationResearch>,
}

impl ScriptedResearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a research bundle to be returned by the next call.
    pub async fn push(&self, research: DestinationResearch) {
        self.queue.lock().await.push_back(Ok(research));
    }

    /// Queue a failure for the next call.
    pub async fn push_failure(&self, message: &str) {
        self.queue.lock().await.push_back(Err(message.to_string()));
    }

    /// The default bundle returned when the queue is empty.
    pub fn default_research() -> DestinationResearch {
        DestinationResearch {
            destinations: vec![
                DestinationBrief {
                    name: "Testville".into(),
                    country: "Testland".into(),
                    summary: "A quiet town for integration tests.".into(),
                    best_season: Some("always".into()),
                    highlights: vec!["The fixture museum".into()],
                },
                DestinationBrief {
                    name: "Mockhaven".into(),
                    country: "Testland".into(),
                    summary: "Coastal, deterministic, never rains.".into(),
                    best_season: Some("always".into()),
                    highlights: vec!["Stub lighthouse".into()],
                },
            ],
            generated_at: now_iso(),
        }
    }
}

#[async_trait]
impl ResearchProvider for ScriptedResearch {
    async fn research(&self, _intake: &TripIntake) -> Result<DestinationResearch, VoyagioError> {
        match self.queue.lock().await.pop_front() {
            Some(Ok(research)) => Ok(research),
            Some(Err(message)) => Err(planner_err(message)),
            None => Ok(Self::default_research()),
        }
    }
}

/// A mock trip planner with independent queues for option generation
/// and itinerary building.
#[derive(Default)]
pub struct ScriptedPlanner {
    options: Scripted<PlannedOptions>,
    itineraries: Scripted<ItineraryDraft>,
}

impl ScriptedPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn push_options(&self, planned: PlannedOptions) {
        self.options.lock().await.push_back(Ok(planned));
    }

    pub async fn push_options_failure(&self, message: &str) {
        self.options.lock().await.push_back(Err(message.to_string()));
    }

    pub async fn push_itinerary(&self, draft: ItineraryDraft) {
        self.itineraries.lock().await.push_back(Ok(draft));
    }

    pub async fn push_itinerary_failure(&self, message: &str) {
        self.itineraries
            .lock()
            .await
            .push_back(Err(message.to_string()));
    }

    /// The default bundle: two options over the trip's confirmed
    /// destinations, one hotel per destination, a flat airfare range.
    pub fn default_options(trip: &Trip) -> PlannedOptions {
        let destinations = if trip.confirmed_destinations.is_empty() {
            vec!["Testville".to_string()]
        } else {
            trip.confirmed_destinations.clone()
        };
        let options = vec![
            TripOption {
                title: "Scripted Option A".into(),
                summary: "Everything, evenly paced.".into(),
                destinations: destinations.clone(),
                pace: Some("balanced".into()),
                highlights: vec![],
            },
            TripOption {
                title: "Scripted Option B".into(),
                summary: "First stop only.".into(),
                destinations: destinations[..1].to_vec(),
                pace: Some("relaxed".into()),
                highlights: vec![],
            },
        ];
        let hotels_shown = destinations
            .iter()
            .map(|d| HotelOption {
                name: format!("{d} Test Hotel"),
                destination: d.clone(),
                nights: 3,
                nightly_low: 100.0,
                nightly_high: 150.0,
                style: Some("test".into()),
            })
            .collect();
        PlannedOptions {
            options,
            hotels_shown,
            airfare_estimate: Some(PriceRange {
                low: 400.0,
                high: 600.0,
            }),
        }
    }

    /// The default draft: one itinerary day per option destination.
    pub fn default_itinerary(trip: &Trip, option_index: usize) -> ItineraryDraft {
        let destinations = trip
            .options
            .as_ref()
            .and_then(|o| o.get(option_index))
            .map(|o| o.destinations.clone())
            .unwrap_or_else(|| vec!["Testville".to_string()]);
        let days = destinations
            .iter()
            .enumerate()
            .map(|(i, d)| ItineraryDay {
                day: i as u32 + 1,
                title: format!("Day in {d}"),
                location: d.clone(),
                activities: vec!["Scripted sightseeing".into()],
                lodging: Some(format!("{d} Test Hotel")),
            })
            .collect();
        let hotels_selected = destinations
            .iter()
            .map(|d| HotelOption {
                name: format!("{d} Test Hotel"),
                destination: d.clone(),
                nights: 3,
                nightly_low: 100.0,
                nightly_high: 150.0,
                style: Some("test".into()),
            })
            .collect();
        ItineraryDraft {
            itinerary: Itinerary {
                days,
                generated_at: now_iso(),
            },
            hotels_selected,
        }
    }
}

#[async_trait]
impl TripPlanner for ScriptedPlanner {
    async fn plan_options(&self, trip: &Trip) -> Result<PlannedOptions, VoyagioError> {
        match self.options.lock().await.pop_front() {
            Some(Ok(planned)) => Ok(planned),
            Some(Err(message)) => Err(planner_err(message)),
            None => Ok(Self::default_options(trip)),
        }
    }

    async fn build_itinerary(
        &self,
        trip: &Trip,
        option_index: usize,
    ) -> Result<ItineraryDraft, VoyagioError> {
        match self.itineraries.lock().await.pop_front() {
            Some(Ok(draft)) => Ok(draft),
            Some(Err(message)) => Err(planner_err(message)),
            None => Ok(Self::default_itinerary(trip, option_index)),
        }
    }
}
